//! Data model for rooted phylogenetic trees of arbitrary degree.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [TreeNode]s. Nodes reference their parent and children by [NodeIndex],
//! so no node holds a reference to another node.
//!
//! Every node carries an id ([NodeId]) besides its arena index. Ids are
//! assigned by one of two explicit passes:
//!
//! | Pass | Used by | Result |
//! |------|---------|--------|
//! | [Tree::assign_during_parse] | Newick parser | parent's maximum descendant id + 1 |
//! | [Tree::renumber_preorder] | reroot, callers after mutation | pre-order numbering |
//!
//! # Paths and distances
//! [Path] holds node ids from the root to a node, [Distance] the edge count
//! and summed branch length between two nodes. Both are produced by
//! [crate::topology::lca].
//!
//! # Taxa
//! [TaxonExtractor] derives the taxon name from a leaf label.

pub mod node;
pub mod path;
pub mod taxon;
pub mod tree;

pub use node::TreeNode;
pub use path::{Distance, Path};
pub use taxon::{TaxonExtractor, TaxonFallback};
pub use tree::{NodeId, NodeIndex, Tree};
