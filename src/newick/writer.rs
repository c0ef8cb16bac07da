//! Newick serialization of [Tree]s.
//!
//! Output is canonical: the children of every node are written in ascending
//! order of their branch length (stable, so ties keep structural order).
//! A `:length` is written only for non-zero lengths and the terminating `;`
//! only after the root.

use crate::model::{NodeIndex, Tree};
use crate::newick::defs::{
    GROUP_CLOSE, GROUP_OPEN, LENGTH_SEPARATOR, SIBLING_SEPARATOR, TERMINATOR,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Writes given list of trees to a file in Newick format, one tree per line.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick_file(file: File, trees: &[Tree]) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    for tree in trees {
        writer.write_all(to_newick(tree).as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// # Example
/// ```
/// use cladesort::model::{Tree, TreeNode};
/// use cladesort::newick::to_newick;
///
/// let mut tree = Tree::new(TreeNode::default());
/// let b = tree.add_node(TreeNode::new("B", 2.0));
/// let a = tree.add_node(TreeNode::new("A", 1.0));
/// let root = tree.root_index();
/// tree.add_child(root, b);
/// tree.add_child(root, a);
///
/// // children are ordered by branch length
/// assert_eq!(to_newick(&tree), "(A:1,B:2);");
/// ```
pub fn to_newick(tree: &Tree) -> String {
    if !tree.is_root_set() {
        return String::new();
    }

    let mut newick = String::with_capacity(estimate_newick_len(tree));
    build_newick(tree, &mut newick, tree.root_index());
    newick.push(TERMINATOR);
    newick
}

/// Returns the Newick representation of the subtree at `index`,
/// without closing semicolon.
pub fn subtree_to_newick(tree: &Tree, index: NodeIndex) -> String {
    let mut newick = String::new();
    build_newick(tree, &mut newick, index);
    newick
}

// Recursive helper for building the Newick string
fn build_newick(tree: &Tree, newick: &mut String, index: NodeIndex) {
    let node = &tree[index];

    if !node.is_leaf() {
        newick.push(GROUP_OPEN);
        for (position, child) in tree.sorted_children(index).into_iter().enumerate() {
            if position > 0 {
                newick.push(SIBLING_SEPARATOR);
            }
            build_newick(tree, newick, child);
        }
        newick.push(GROUP_CLOSE);
    }

    newick.push_str(node.label());
    if node.length() != 0.0 {
        newick.push(LENGTH_SEPARATOR);
        newick.push_str(&node.length().to_string());
    }
}

/// Estimates the length of a Newick string for a given tree.
fn estimate_newick_len(tree: &Tree) -> usize {
    // "(,)" and ":0.0123456789" per node, roughly
    const STRUCTURE_CHARS: usize = 3;
    const BRANCH_LENGTH_CHARS: usize = 12;

    let label_capacity: usize = tree
        .pre_order_iter()
        .map(|i| tree[i].label().len())
        .sum();

    tree.num_nodes() * (STRUCTURE_CHARS + BRANCH_LENGTH_CHARS) + label_capacity + BUFFER_CHARS
}
