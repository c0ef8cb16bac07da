//! Cladesort is a library to parse phylogenetic trees in Newick notation and
//! to sort and cluster large tree collections by taxonomic composition.
//!
//! Core functionality provided:
//! - Newick: Parse a single terminated Newick string or the first tree of a
//!   file (lines trimmed and joined) into a [Tree], and write it back with
//!   children ordered by branch length.
//! - Tree model: [Tree] stores [TreeNode](model::TreeNode)s of arbitrary
//!   degree in an arena; nodes reference each other only by index.
//!   See [crate::model] for details.
//! - Topology ([crate::topology]):
//!   - Root paths, lowest common ancestors, distances, nearest/farthest leaves
//!   - Inclusive and exclusive monophyletic clade matching against taxon groups
//!   - Rerooting at an outgroup (pure, length conserving)
//!   - Node removal with collapse of single-child nodes (in place)
//!   - Support label cleaning and log10 branch length transform
//! - Clustering: merge trees sharing taxa into connected clusters
//!   ([crate::cluster]).
//! - Batch: sort or cluster whole directories of tree files
//!   ([crate::batch]), configured by [SortConfig](config::SortConfig).
//!
//! Limitations:
//! - No quoted labels, comments or extended Newick annotations
//! - One tree per file
//!
//! # Usage patterns
//!
//! Parse a Newick string and query it:
//! ```
//! use cladesort::parse_newick_str;
//! use cladesort::topology::lca;
//!
//! let tree = parse_newick_str("((A:0.1,B:0.2)90:0.3,C:0.4);").unwrap();
//! assert_eq!(tree.size(), 3);
//!
//! let a = tree.find("A").unwrap();
//! let b = tree.find("B").unwrap();
//! let ancestor = lca::lca_node(&tree, &[a, b]).unwrap();
//! assert_eq!(tree[ancestor].label(), "90");
//! ```
//!
//! Match a clade:
//! ```
//! use cladesort::config::{MatchConfig, MatchMode};
//! use cladesort::parse_newick_str;
//! use cladesort::topology::{TaxonGroups, monophyletic_node};
//!
//! let tree = parse_newick_str("(((human,chimp),gorilla),(mouse,rat));").unwrap();
//! let groups = TaxonGroups::new([vec!["human", "chimp"], vec!["gorilla"]]);
//! let config = MatchConfig::default().with_mode(MatchMode::Exclusive);
//!
//! let clade = monophyletic_node(&tree, &groups, &config, None).unwrap();
//! assert_eq!(tree.size_of(clade), 3);
//! ```

pub mod batch;
pub mod cluster;
pub mod config;
pub mod error;
pub mod model;
pub mod newick;
pub mod parser;
pub mod topology;

use crate::model::Tree;
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string using default settings, returning a [Tree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    newick::parse_str(newick)
}

/// Parse the first tree of a file using default settings, returning a [Tree].
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<Tree, ParsingError> {
    newick::parse_file(path)
}
