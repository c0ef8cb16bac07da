//! Topology queries and mutations on [Tree](crate::model::Tree)s.
//!
//! | Module | Operations | Effect on the input |
//! |--------|------------|---------------------|
//! | [lca] | paths, LCA, distances, nearest/farthest leaf | read-only |
//! | [clade] | inclusive and exclusive clade matching | read-only |
//! | [reroot] | rerooting at an outgroup | returns a new tree |
//! | [prune] | node removal with collapse | mutates in place |
//! | [transform] | support cleaning, log10 lengths, statistics | mixed, see functions |

pub mod clade;
pub mod lca;
pub mod prune;
pub mod reroot;
pub mod transform;

pub use clade::{TaxonGroups, all_monophyletic_nodes, monophyletic_node};
pub use lca::{distance, lca, lca_node, path_from_root};
pub use prune::{remove_node, remove_nodes};
pub use reroot::reroot;
