//! Root-to-node paths and node distances.

use crate::model::tree::NodeId;

/// Ordered node ids from a start node (usually the root) down to a target
/// node, start first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(Vec<NodeId>);

impl Path {
    pub fn new(ids: Vec<NodeId>) -> Self {
        Path(ids)
    }

    /// Returns the ids on this path, start first.
    pub fn ids(&self) -> &[NodeId] {
        &self.0
    }

    /// Returns the number of nodes on this path (edges + 1).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the id at the given depth, relative to the start of the path.
    pub fn get(&self, depth: usize) -> Option<NodeId> {
        self.0.get(depth).copied()
    }

    /// Returns the id of the target node.
    pub fn target(&self) -> Option<NodeId> {
        self.0.last().copied()
    }

    /// Returns `true` if the node with the given id lies on this path.
    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }
}

impl From<Vec<NodeId>> for Path {
    fn from(ids: Vec<NodeId>) -> Self {
        Path(ids)
    }
}

impl IntoIterator for Path {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Distance between two nodes of one tree, measured through their
/// lowest common ancestor.
///
/// # Fields
/// - `depth` - number of edges on the connecting path
/// - `length` - sum of branch lengths on the connecting path
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Distance {
    pub depth: usize,
    pub length: f64,
}

impl Distance {
    pub fn new(depth: usize, length: f64) -> Self {
        Distance { depth, length }
    }
}
