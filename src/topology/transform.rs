//! Label and branch-length transforms plus per-tree statistics.

use crate::model::{NodeIndex, TaxonExtractor, Tree};
use std::collections::{HashMap, HashSet};

/// Returns the support value stored in the label of `node`, or `None` if the
/// label is not a number.
pub fn support(tree: &Tree, node: NodeIndex) -> Option<f64> {
    tree[node].label().trim().parse::<f64>().ok()
}

/// Clears support labels of internal nodes that are below `min` or are no
/// number. Leaf labels are left untouched.
///
/// # Example
/// ```
/// use cladesort::parse_newick_str;
/// use cladesort::topology::transform::clean_support;
///
/// let mut tree = parse_newick_str("(((a,b)40,c)95,d);").unwrap();
/// clean_support(&mut tree, 50.0);
/// assert_eq!(tree.to_newick(), "(((a,b),c)95,d);");
/// ```
pub fn clean_support(tree: &mut Tree, min: f64) {
    let internal: Vec<NodeIndex> = tree
        .pre_order_iter()
        .filter(|&i| !tree[i].is_leaf() && !tree[i].label().is_empty())
        .collect();

    for node in internal {
        let keep = match support(tree, node) {
            Some(value) => value >= min,
            None => {
                tracing::warn!(label = tree[node].label(), "Failed parsing internal label");
                false
            }
        };
        if !keep {
            tree[node].set_label("");
        }
    }
}

/// Returns a copy of the tree with every branch length replaced by
/// `log10(scale * length)`; non-positive lengths become 0.
pub fn log10_lengths(tree: &Tree, scale: f64) -> Tree {
    let mut transformed = tree.copy_subtree(tree.root_index(), None);
    let nodes: Vec<NodeIndex> = transformed.pre_order_iter().collect();
    for node in nodes {
        let length = transformed[node].length();
        let log10 = if length > 0.0 {
            (scale * length).log10()
        } else {
            0.0
        };
        transformed[node].set_length(log10);
    }
    transformed
}

/// Returns the average number of leaves per distinct taxon.
///
/// Leaves without taxon are counted as one taxon of their own.
///
/// # Example
/// ```
/// use cladesort::model::TaxonExtractor;
/// use cladesort::parse_newick_str;
/// use cladesort::topology::transform::average_copies;
///
/// let tree = parse_newick_str("((human_1,human_2),(mouse_1,rat_1));").unwrap();
/// let extractor = TaxonExtractor::new(r"(\w+)_\d+", 1).unwrap();
/// assert_eq!(average_copies(&tree, &extractor), 4.0 / 3.0);
/// ```
pub fn average_copies(tree: &Tree, extractor: &TaxonExtractor) -> f64 {
    let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
    for leaf in tree.leaves() {
        *counts.entry(extractor.taxon_of(tree, leaf)).or_default() += 1;
    }

    if counts.is_empty() {
        return 0.0;
    }
    let sum: usize = counts.values().sum();
    sum as f64 / counts.len() as f64
}

/// Returns the first leaf (pre-order) whose taxon is not in `ingroup`.
pub fn find_outgroup(
    tree: &Tree,
    extractor: &TaxonExtractor,
    ingroup: &HashSet<String>,
) -> Option<NodeIndex> {
    tree.leaves().into_iter().find(|&leaf| {
        extractor
            .taxon_of(tree, leaf)
            .is_none_or(|taxon| !ingroup.contains(taxon))
    })
}
