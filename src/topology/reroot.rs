//! Rerooting a tree at an outgroup.
//!
//! [reroot] never touches its input: it builds the rerooted tree bottom-up
//! from copies into a fresh arena. Branch length is only redistributed, so
//! [Tree::total_length] is the same before and after.

use crate::model::{NodeIndex, Tree, TreeNode};

/// Returns a copy of `tree` rerooted at `outgroup`.
///
/// * Outgroup is the root: plain copy.
/// * Leaf outgroup: a new root gets two children, the outgroup and a new
///   sister node, each with half of the outgroup's branch length.
/// * Internal outgroup: the outgroup becomes the root and the sister hangs
///   below it with the outgroup's former branch length.
///
/// The sister holds copies of the outgroup's siblings and, if the outgroup's
/// parent was not the root, the rest of the tree rerooted at the grandparent.
/// That part inherits the parent's branch length and label.
///
/// The result has root length 0 and is renumbered in pre-order.
///
/// # Example
/// ```
/// use cladesort::parse_newick_str;
/// use cladesort::topology::reroot::reroot;
///
/// let tree = parse_newick_str("(((a,b),c)60:1,d:2);").unwrap();
/// let d = tree.find("d").unwrap();
/// let rerooted = reroot(&tree, d);
///
/// assert_eq!(rerooted.to_newick(), "(d:1,(((a,b),c)60:1):1);");
/// assert_eq!(rerooted.total_length(), tree.total_length());
/// ```
pub fn reroot(tree: &Tree, outgroup: NodeIndex) -> Tree {
    let mut rerooted = Tree::with_capacity(tree.arena_len() + 2);
    let root = reroot_into(tree, outgroup, None, &mut rerooted);
    rerooted.set_root(root);
    rerooted[root].set_length(0.0);
    rerooted.renumber_preorder();
    rerooted
}

/// Builds the subtree rerooted at `outgroup` into `target` and returns its root.
///
/// `came_from` is the child of `outgroup` that the recursion arrived from;
/// its subtree is already placed and is skipped while copying.
fn reroot_into(
    tree: &Tree,
    outgroup: NodeIndex,
    came_from: Option<NodeIndex>,
    target: &mut Tree,
) -> NodeIndex {
    let copied = tree.copy_subtree_into(outgroup, came_from, target);

    let Some(parent) = tree[outgroup].parent() else {
        return copied;
    };

    let length = tree[outgroup].length();
    let sister = target.add_node(TreeNode::default());
    let root = if target[copied].is_leaf() {
        let root = target.add_node(TreeNode::default());
        target[copied].set_length(length / 2.0);
        target[sister].set_length(length / 2.0);
        target.add_child(root, copied);
        target.add_child(root, sister);
        root
    } else {
        target[sister].set_length(length);
        target.add_child(copied, sister);
        copied
    };

    for &sibling in tree[parent].children() {
        if sibling != outgroup {
            let copy = tree.copy_subtree_into(sibling, None, target);
            target.add_child(sister, copy);
        }
    }

    if let Some(grandparent) = tree[parent].parent() {
        let rest = reroot_into(tree, grandparent, Some(parent), target);
        target[rest].set_length(tree[parent].length());
        target[rest].set_label(tree[parent].label());
        target.add_child(sister, rest);
    }

    root
}
