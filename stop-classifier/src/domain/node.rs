//! Network node types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in the planning highway/transit network.
///
/// Matches the node numbering of the underlying network file, so results can
/// be joined back to the spatial layer that buffers them.
///
/// # Examples
///
/// ```
/// use stop_classifier::domain::NodeId;
///
/// let n = NodeId(4123);
/// assert_eq!(n.to_string(), "4123");
///
/// // NodeId is Copy and Ord, so it sorts and keys maps cheaply
/// let mut ids = vec![NodeId(9), NodeId(2), NodeId(5)];
/// ids.sort();
/// assert_eq!(ids, vec![NodeId(2), NodeId(5), NodeId(9)]);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        NodeId(value)
    }
}

/// A node's coordinates in the network's projected system.
///
/// Carried through to the output untouched; this core never interprets
/// geometry. The spatial reference is whatever the network file uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_numeric() {
        assert!(NodeId(1) < NodeId(2));
        assert!(NodeId(100) > NodeId(99));
        assert_eq!(NodeId(7), NodeId(7));
    }

    #[test]
    fn serde_transparent() {
        let n: NodeId = serde_json::from_str("4123").unwrap();
        assert_eq!(n, NodeId(4123));
        assert_eq!(serde_json::to_string(&n).unwrap(), "4123");
    }
}
