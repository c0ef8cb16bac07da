//! Provides the arena-backed [Tree] representation.
//!
//! * [Tree] - owns all [TreeNode]s of one phylogenetic tree in an arena
//! * [NodeIndex] - position of a node in the arena
//! * [NodeId] - node identifier produced by the id passes
//!   (see [Tree::assign_during_parse] and [Tree::renumber_preorder])
//! * [PreOrderIter] and [PostOrderIter] - stack-based traversals

use crate::model::node::{DEFAULT_ROOT_ID, DEFAULT_ROOT_LEVEL, TreeNode};
use crate::newick;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

/// Identifier of a node, unique within a tree after an id pass.
pub type NodeId = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: NodeIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree with arbitrary node degree, stored using the
/// arena pattern on [TreeNode].
///
/// Nodes are stored in a contiguous vector and linked by [NodeIndex]:
/// each node knows the index of its parent and the ordered indices of its
/// children. This replaces mutual parent/child references, so the
/// "child owned by its parent" invariant is kept in one place, [Tree::add_child].
///
/// # Structure
/// - Exactly one reachable node has no parent: the root.
/// - Every other reachable node appears exactly once in its parent's children.
/// - Nodes removed by pruning stay in the arena but are detached;
///   all queries start at the root, so detached nodes are never visited.
///   [Tree::compact] drops them.
/// - Node ids are independent of arena indices; they are unique only after an
///   id pass.
#[derive(Debug, Clone)]
pub struct Tree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<TreeNode>,

    /// Index of the root of this tree
    root_index: NodeIndex,
}

// ============================================================================
// New, Getters / Accessors, Construction (pub)
// ============================================================================
impl Tree {
    /// Creates a tree consisting only of the given node, which becomes the root.
    pub fn new(root: TreeNode) -> Self {
        let mut tree = Self::with_capacity(1);
        let index = tree.add_node(root);
        tree.set_root(index);
        tree
    }

    /// Creates an empty tree without root, with room for `capacity` nodes.
    ///
    /// Add nodes with [Tree::add_node], link them with [Tree::add_child]
    /// and finally call [Tree::set_root].
    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            nodes: Vec::with_capacity(capacity),
            root_index: NO_ROOT_SET_INDEX,
        }
    }

    /// Adds a detached node to the arena and returns its index.
    pub fn add_node(&mut self, node: TreeNode) -> NodeIndex {
        let index = self.nodes.len();
        let mut node = node;
        node.set_parent(None);
        node.children_mut().clear();
        self.nodes.push(node);
        index
    }

    /// Attaches `child` as last child of `parent`.
    ///
    /// Inserting a child twice is a no-op. If `child` currently hangs below
    /// another parent, it is detached from there first.
    ///
    /// # Panics
    /// Panics if either index is out of bounds or `parent == child`.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        assert_ne!(parent, child, "A node cannot be its own child");
        if self.nodes[parent].has_child(child) {
            self.nodes[child].set_parent(Some(parent));
            return;
        }

        if self.nodes[child].parent().is_some() {
            self.detach(child);
        }

        self.nodes[parent].children_mut().push(child);
        self.nodes[child].set_parent(Some(parent));
    }

    /// Replaces `old` in the children of its parent with `new`, keeping the
    /// position. `old` ends up detached.
    ///
    /// Returns `false` (and changes nothing) if `old` has no parent.
    pub(crate) fn replace_child(&mut self, old: NodeIndex, new: NodeIndex) -> bool {
        let Some(parent) = self.nodes[old].parent() else {
            return false;
        };

        if self.nodes[new].parent().is_some() {
            self.detach(new);
        }

        let children = self.nodes[parent].children_mut();
        if let Some(position) = children.iter().position(|&c| c == old) {
            children[position] = new;
        }
        self.nodes[new].set_parent(Some(parent));
        self.nodes[old].set_parent(None);
        true
    }

    /// Detaches `child` from its parent. The node stays in the arena.
    pub fn detach(&mut self, child: NodeIndex) {
        if let Some(parent) = self.nodes[child].parent() {
            self.nodes[parent].children_mut().retain(|&c| c != child);
            self.nodes[child].set_parent(None);
        }
    }

    /// Makes the given node the root of this tree and clears its parent link.
    pub fn set_root(&mut self, index: NodeIndex) {
        self.detach(index);
        self.root_index = index;
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> NodeIndex {
        self.root_index
    }

    /// Returns a reference to the root node.
    ///
    /// # Panics
    /// Panics if the root hasn't been set.
    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root_index]
    }

    /// Returns `true` if `index` is the root of this tree.
    pub fn is_root(&self, index: NodeIndex) -> bool {
        index == self.root_index
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &TreeNode {
        &self.nodes[index]
    }

    /// Returns a mutable reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut TreeNode {
        &mut self.nodes[index]
    }

    /// Returns the number of arena slots, including detached nodes.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of nodes reachable from the root.
    pub fn num_nodes(&self) -> usize {
        self.pre_order_iter().count()
    }

    /// Returns the number of leaves (terminal nodes) in this tree, 0 if the
    /// root hasn't been set.
    pub fn size(&self) -> usize {
        self.pre_order_iter()
            .filter(|&i| self.nodes[i].is_leaf())
            .count()
    }

    /// Returns the number of leaves under the given node.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn size_of(&self, index: NodeIndex) -> usize {
        self.pre_order_from(index)
            .filter(|&i| self.nodes[i].is_leaf())
            .count()
    }

    /// Returns the leaves under the given node in pre-order.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn leaves_of(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.pre_order_from(index)
            .filter(|&i| self.nodes[i].is_leaf())
            .collect()
    }

    /// Returns all leaves of this tree in pre-order.
    pub fn leaves(&self) -> Vec<NodeIndex> {
        self.pre_order_iter()
            .filter(|&i| self.nodes[i].is_leaf())
            .collect()
    }

    /// Returns the children of a node ordered by ascending branch length.
    ///
    /// The sort is stable, so ties keep their structural order.
    pub fn sorted_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut sorted = self.nodes[index].children().to_vec();
        sorted.sort_by(|&a, &b| self.nodes[a].length().total_cmp(&self.nodes[b].length()));
        sorted
    }

    /// Returns the sum of all branch lengths below the root.
    ///
    /// The length stored on the root itself does not describe an edge
    /// of the tree and is ignored.
    pub fn total_length(&self) -> f64 {
        self.pre_order_iter()
            .filter(|&i| i != self.root_index)
            .map(|i| self.nodes[i].length())
            .sum()
    }

    /// Returns an iterator over the ancestors of a node, parent first, root last.
    pub fn ancestors(&self, index: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes[index].parent(),
        }
    }

    /// Returns `true` if `ancestor` lies on the path from `index` to the root
    /// (a node counts as its own ancestor).
    pub fn is_ancestor(&self, ancestor: NodeIndex, index: NodeIndex) -> bool {
        index == ancestor || self.ancestors(index).any(|a| a == ancestor)
    }
}

impl std::ops::Index<NodeIndex> for Tree {
    type Output = TreeNode;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

impl std::ops::IndexMut<NodeIndex> for Tree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}

// ============================================================================
// Lookup (pub)
// ============================================================================
impl Tree {
    /// Finds the first node in pre-order whose label starts with `query`.
    ///
    /// # Example
    /// ```
    /// use cladesort::parse_newick_str;
    ///
    /// let tree = parse_newick_str("((Homo_sapiens:1,Pan:2):1,Gorilla:3);").unwrap();
    /// let human = tree.find("Homo").unwrap();
    /// assert_eq!(tree[human].label(), "Homo_sapiens");
    /// assert!(tree.find("Pongo").is_none());
    /// ```
    pub fn find(&self, query: &str) -> Option<NodeIndex> {
        self.pre_order_iter()
            .find(|&i| self.nodes[i].label().starts_with(query))
    }

    /// Finds the first node in pre-order whose whole label matches `pattern`.
    pub fn find_matching(&self, pattern: &regex::Regex) -> Option<NodeIndex> {
        self.pre_order_iter().find(|&i| {
            let label = self.nodes[i].label();
            pattern
                .find(label)
                .is_some_and(|m| m.start() == 0 && m.end() == label.len())
        })
    }

    /// Returns the index of the (first, in pre-order) node with the given id.
    pub fn find_by_id(&self, id: NodeId) -> Option<NodeIndex> {
        self.pre_order_iter().find(|&i| self.nodes[i].id() == id)
    }

    /// Returns the maximum id in the subtree rooted at `index`.
    pub fn max_id_in_subtree(&self, index: NodeIndex) -> NodeId {
        self.pre_order_from(index)
            .map(|i| self.nodes[i].id())
            .max()
            .unwrap_or_else(|| self.nodes[index].id())
    }
}

// ============================================================================
// Id passes (pub)
// ============================================================================
impl Tree {
    /// Assigns id and level to a freshly attached node, based on its parent.
    ///
    /// The root gets id 0 and level 0. Any other node gets
    /// `level = parent.level + 1` and `id = max id below the parent + 1`,
    /// where the maximum is taken *before* the node is attached.
    /// Ids therefore depend on the order in which nodes are created;
    /// for a fresh parse they coincide with [Tree::renumber_preorder].
    ///
    /// # Arguments
    /// * `index` - Node to number, not yet attached to `parent`
    /// * `parent` - Future parent, `None` for the root
    pub fn assign_during_parse(&mut self, index: NodeIndex, parent: Option<NodeIndex>) {
        let (id, level) = match parent {
            None => (DEFAULT_ROOT_ID, DEFAULT_ROOT_LEVEL),
            Some(p) => (self.max_id_in_subtree(p) + 1, self.nodes[p].level() + 1),
        };
        let node = &mut self.nodes[index];
        node.set_id(id);
        node.set_level(level);
    }

    /// Renumbers all reachable nodes in pre-order, starting with id 0 at the
    /// root, and recomputes levels.
    pub fn renumber_preorder(&mut self) {
        if !self.is_root_set() {
            return;
        }

        let mut next_id = DEFAULT_ROOT_ID;
        let mut stack = vec![(self.root_index, DEFAULT_ROOT_LEVEL)];
        while let Some((index, level)) = stack.pop() {
            let node = &mut self.nodes[index];
            node.set_id(next_id);
            node.set_level(level);
            next_id += 1;

            for &child in node.children().iter().rev() {
                stack.push((child, level + 1));
            }
        }
    }
}

// ============================================================================
// Copying & Compaction (pub)
// ============================================================================
impl Tree {
    /// Returns an independent tree holding a deep copy of the subtree at
    /// `index`, keeping ids, levels, labels and lengths.
    ///
    /// # Arguments
    /// * `index` - Root of the subtree to copy
    /// * `exclude` - Optional node whose subtree is skipped while copying
    pub fn copy_subtree(&self, index: NodeIndex, exclude: Option<NodeIndex>) -> Tree {
        let mut copy = Tree::with_capacity(self.size_of(index) * 2);
        let root = self.copy_subtree_into(index, exclude, &mut copy);
        copy.set_root(root);
        copy
    }

    /// Copies the subtree at `index` of this tree into `target` (as detached
    /// subtree) and returns the index of the copied subtree root in `target`.
    pub fn copy_subtree_into(
        &self,
        index: NodeIndex,
        exclude: Option<NodeIndex>,
        target: &mut Tree,
    ) -> NodeIndex {
        let copied_root = target.add_node(self.nodes[index].detached_copy());
        let mut stack = vec![(index, copied_root)];
        while let Some((source, copied)) = stack.pop() {
            // Push in reverse, but attach in order, to keep structural order
            let mut pending = Vec::with_capacity(self.nodes[source].num_children());
            for &child in self.nodes[source].children() {
                if Some(child) == exclude {
                    continue;
                }
                let copied_child = target.add_node(self.nodes[child].detached_copy());
                target.add_child(copied, copied_child);
                pending.push((child, copied_child));
            }
            stack.extend(pending.into_iter().rev());
        }
        copied_root
    }

    /// Drops all detached nodes from the arena, renumbering arena indices
    /// in pre-order. Node ids and levels are left untouched.
    pub fn compact(&mut self) {
        if !self.is_root_set() {
            return;
        }

        let order: Vec<NodeIndex> = self.pre_order_iter().collect();
        let remap: HashMap<NodeIndex, NodeIndex> = order
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();

        let mut nodes = Vec::with_capacity(order.len());
        for &old in &order {
            let mut node = self.nodes[old].clone();
            let parent = node.parent().and_then(|p| remap.get(&p).copied());
            node.set_parent(parent);
            let children: Vec<NodeIndex> =
                node.children().iter().map(|c| remap[c]).collect();
            *node.children_mut() = children;
            nodes.push(node);
        }

        self.nodes = nodes;
        self.root_index = 0;
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl Tree {
    /// Validates the structure reachable from the root.
    ///
    /// Checks:
    /// - Root is set, in bounds and has no parent
    /// - No node is reachable twice (acyclic)
    /// - Every child points back to its parent
    /// - Ids are unique and `level(child) = level(parent) + 1`
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if !self.is_root_set() || self.root_index >= self.nodes.len() {
            return false;
        }

        if self.nodes[self.root_index].parent().is_some() {
            return false;
        }

        if self.nodes[self.root_index].level() != DEFAULT_ROOT_LEVEL {
            return false;
        }

        let mut seen = HashSet::new();
        let mut ids = HashSet::new();
        let mut stack = vec![self.root_index];
        while let Some(index) = stack.pop() {
            if index >= self.nodes.len() || !seen.insert(index) {
                return false;
            }

            let node = &self.nodes[index];
            if !ids.insert(node.id()) {
                return false;
            }

            for &child in node.children() {
                if child >= self.nodes.len() {
                    return false;
                }
                let child_node = &self.nodes[child];
                if child_node.parent() != Some(index) {
                    return false;
                }
                if child_node.level() != node.level() + 1 {
                    return false;
                }
                stack.push(child);
            }
        }

        true
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
impl Tree {
    /// Returns the Newick representation of this tree, terminated by `;`.
    ///
    /// See [newick::to_newick].
    pub fn to_newick(&self) -> String {
        newick::to_newick(self)
    }

    /// Renders the tree as indented text, one node per line.
    ///
    /// # Example Output
    /// ```text
    /// [0] (length: 0.000)
    ///   ├─ [1] 90 (length: 0.300)
    ///   │   ├─ [2] "A" (length: 0.100)
    ///   │   └─ [3] "B" (length: 0.200)
    ///   └─ [4] "C" (length: 0.400)
    /// ```
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        if self.is_root_set() {
            self.render_node(self.root_index, "", true, &mut out);
        } else {
            out.push_str("(No root set)\n");
        }
        out
    }

    fn render_node(&self, index: NodeIndex, prefix: &str, is_last: bool, out: &mut String) {
        let node = &self.nodes[index];

        let connector = if prefix.is_empty() {
            ""
        } else if is_last {
            "└─ "
        } else {
            "├─ "
        };

        if node.is_leaf() {
            out.push_str(&format!(
                "{}{}[{}] \"{}\" (length: {:.3})\n",
                prefix,
                connector,
                node.id(),
                node.label(),
                node.length()
            ));
            return;
        }

        out.push_str(&format!(
            "{}{}[{}] {}(length: {:.3})\n",
            prefix,
            connector,
            node.id(),
            if node.label().is_empty() {
                String::new()
            } else {
                format!("{} ", node.label())
            },
            node.length()
        ));

        let new_prefix = if prefix.is_empty() {
            "  ".to_string()
        } else {
            format!("{}{}  ", prefix, if is_last { " " } else { "│" })
        };

        let children = node.children();
        for (position, &child) in children.iter().enumerate() {
            self.render_node(child, &new_prefix, position + 1 == children.len(), out);
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_newick())
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the whole tree in pre-order (parents before children).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self, self.is_root_set().then_some(self.root_index))
    }

    /// Returns an iterator over the subtree at `index` in pre-order.
    pub fn pre_order_from(&self, index: NodeIndex) -> PreOrderIter<'_> {
        PreOrderIter::new(self, Some(index))
    }

    /// Returns an iterator over the whole tree in post-order (children before parents).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self, self.is_root_set().then_some(self.root_index))
    }

    /// Returns an iterator over the subtree at `index` in post-order.
    pub fn post_order_from(&self, index: NodeIndex) -> PostOrderIter<'_> {
        PostOrderIter::new(self, Some(index))
    }
}

/// Iterator for pre-order traversal (parents before children), yielding
/// node indices.
///
/// Uses an explicit stack, so deep trees do not exhaust the call stack.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree, start: Option<NodeIndex>) -> Self {
        PreOrderIter {
            tree,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        // Push children reversed, so the first child is processed first
        self.stack
            .extend(self.tree.nodes[index].children().iter().rev().copied());
        Some(index)
    }
}

/// Iterator for post-order traversal (children before parents), yielding
/// node indices.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree, start: Option<NodeIndex>) -> Self {
        PostOrderIter {
            tree,
            stack: start.map(|s| (s, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree.nodes[index];
            if children_visited || node.is_leaf() {
                return Some(index);
            }

            self.stack.push((index, true));
            for &child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator over the ancestors of a node, created by [Tree::ancestors].
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeIndex>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.nodes[current].parent();
        Some(current)
    }
}
