//! In-place removal of nodes with collapse of single-child nodes.
//!
//! Removed nodes stay detached in the arena until [Tree::compact] runs;
//! [remove_nodes] compacts on its own. Ids and levels are not renumbered,
//! call [Tree::renumber_preorder] when they are needed afterwards.

use crate::error::TreeError;
use crate::model::{NodeIndex, Tree};

/// Removes `node` (with its subtree) from the tree and returns the index of
/// the (possibly new) root.
///
/// * Parent is the root with more than two children: `node` is dropped.
/// * Parent is the root otherwise: the remaining child becomes the root.
/// * Parent is internal: `node` is dropped. A parent left without children
///   is removed as well, a parent left with one child is collapsed: the
///   child takes the parent's place with both branch lengths summed.
///
/// # Errors
/// * [TreeError::RootRemoval] - `node` is the root
/// * [TreeError::EmptyTree] - `node` is the only child of the root
/// * [TreeError::UnknownNode] - `node` is not reachable from the root
/// * [TreeError::Invariant] - a collapse found other than one child
///
/// # Example
/// ```
/// use cladesort::parse_newick_str;
/// use cladesort::topology::prune::remove_node;
///
/// let mut tree = parse_newick_str("((a:1,b:2):3,c:4);").unwrap();
/// let b = tree.find("b").unwrap();
/// remove_node(&mut tree, b).unwrap();
/// assert_eq!(tree.to_newick(), "(a:4,c:4);");
/// ```
pub fn remove_node(tree: &mut Tree, node: NodeIndex) -> Result<NodeIndex, TreeError> {
    if node >= tree.arena_len() {
        return Err(TreeError::UnknownNode(node));
    }
    if tree.is_root(node) {
        return Err(TreeError::RootRemoval);
    }
    if !tree.is_root_set() || !tree.is_ancestor(tree.root_index(), node) {
        return Err(TreeError::UnknownNode(node));
    }
    let Some(parent) = tree[node].parent() else {
        return Err(TreeError::UnknownNode(node));
    };

    if tree.is_root(parent) {
        return remove_root_child(tree, parent, node);
    }

    tree.detach(node);
    match tree[parent].num_children() {
        0 => remove_node(tree, parent),
        1 => {
            collapse(tree, parent)?;
            Ok(tree.root_index())
        }
        _ => Ok(tree.root_index()),
    }
}

/// Removes the first node (pre-order) whose label starts with each name,
/// then compacts the arena. Names without a node are skipped.
///
/// # Errors
/// Stops at the first failing removal, see [remove_node].
pub fn remove_nodes<S: AsRef<str>>(tree: &mut Tree, names: &[S]) -> Result<(), TreeError> {
    for name in names {
        match tree.find(name.as_ref()) {
            Some(node) => {
                remove_node(tree, node)?;
            }
            None => tracing::debug!(name = name.as_ref(), "No node to remove"),
        }
    }
    tree.compact();
    Ok(())
}

fn remove_root_child(
    tree: &mut Tree,
    root: NodeIndex,
    node: NodeIndex,
) -> Result<NodeIndex, TreeError> {
    let num_children = tree[root].num_children();
    if num_children == 1 {
        return Err(TreeError::EmptyTree);
    }

    tree.detach(node);
    if num_children > 2 {
        return Ok(root);
    }

    let remaining = tree[root]
        .children()
        .first()
        .copied()
        .ok_or(TreeError::EmptyTree)?;
    tree.set_root(remaining);
    Ok(remaining)
}

/// Replaces `parent` by its single child, adding the parent's branch length
/// to the child's.
fn collapse(tree: &mut Tree, parent: NodeIndex) -> Result<(), TreeError> {
    let &[child] = tree[parent].children() else {
        return Err(TreeError::Invariant(format!(
            "collapsing node {} with {} children",
            tree[parent].id(),
            tree[parent].num_children()
        )));
    };

    let length = tree[parent].length() + tree[child].length();
    if !tree.replace_child(parent, child) {
        return Err(TreeError::Invariant(format!(
            "collapsing node {} without parent",
            tree[parent].id()
        )));
    }
    tree[child].set_length(length);
    Ok(())
}
