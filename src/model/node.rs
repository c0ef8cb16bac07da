//! Node type for the arena-backed [Tree](crate::model::Tree).

use crate::model::tree::{NodeId, NodeIndex};

/// Id of the root after any id assignment pass.
pub const DEFAULT_ROOT_ID: NodeId = 0;

/// Level (depth) of the root.
pub const DEFAULT_ROOT_LEVEL: usize = 0;

/// Branch length used when none is given.
pub const DEFAULT_BRANCH_LENGTH: f64 = 0.0;

// =#========================================================================#=
// TREE NODE
// =#========================================================================#=
/// A node of a phylogenetic tree: root, internal node or leaf (OTU).
///
/// Nodes live in the arena of exactly one [Tree](crate::model::Tree) and
/// reference their parent and children by [NodeIndex]. A node without
/// children is a leaf.
///
/// # Fields
/// - `id` - identifier, unique within the tree after an id pass
///   (see [Tree::renumber_preorder](crate::model::Tree::renumber_preorder))
/// - `level` - depth from the root, root is 0
/// - `label` - taxon label for leaves, support value (or empty) for internal nodes
/// - `length` - length of the branch to the parent, 0 by default
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    id: NodeId,
    level: usize,
    label: String,
    length: f64,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

impl Default for TreeNode {
    fn default() -> Self {
        Self {
            id: DEFAULT_ROOT_ID,
            level: DEFAULT_ROOT_LEVEL,
            label: String::new(),
            length: DEFAULT_BRANCH_LENGTH,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl TreeNode {
    /// Creates a detached node with the given label and branch length.
    ///
    /// # Arguments
    /// * `label` - Taxon label (leaf) or support value (internal node)
    /// * `length` - Length of the branch to the (future) parent
    pub fn new<S: Into<String>>(label: S, length: f64) -> Self {
        Self {
            label: label.into(),
            length,
            ..Self::default()
        }
    }

    /// Returns a detached copy of this node's payload (id, level, label, length)
    /// without any links.
    pub(crate) fn detached_copy(&self) -> Self {
        Self {
            id: self.id,
            level: self.level,
            label: self.label.clone(),
            length: self.length,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Returns the id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }

    /// Returns the depth of this node, with the root at level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn set_level(&mut self, level: usize) {
        self.level = level;
    }

    /// Returns the label of this node (possibly empty).
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label<S: Into<String>>(&mut self, label: S) {
        self.label = label.into();
    }

    /// Returns the length of the branch to the parent.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length;
    }

    /// Returns the arena index of the parent, or `None` for a root or detached node.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeIndex>) {
        self.parent = parent;
    }

    /// Returns the arena indices of the children in structural order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeIndex> {
        &mut self.children
    }

    /// Returns the number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node has no parent.
    ///
    /// Note that nodes detached by pruning also have no parent;
    /// use [Tree::root_index](crate::model::Tree::root_index) to identify the root of a tree.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns `true` if `child` is among the children of this node.
    pub fn has_child(&self, child: NodeIndex) -> bool {
        self.children.contains(&child)
    }
}
