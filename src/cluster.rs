//! Overlap-based clustering of trees by shared taxa.
//!
//! Every tree starts as a singleton [TreeCluster]. Rounds of pairwise
//! comparison merge clusters sharing at least `min_overlap` taxa until a
//! round merges nothing. The result is the set of connected components of
//! the overlap relation. Each round is quadratic in the number of clusters.
//!
//! # Example
//! ```
//! use cladesort::cluster::ClusterMerger;
//!
//! let mut merger = ClusterMerger::new(1);
//! merger.add_tree("tree1", ["a", "b"]);
//! merger.add_tree("tree2", ["b", "c"]);
//! merger.add_tree("tree3", ["d", "e"]);
//!
//! let outcome = merger.run();
//! assert_eq!(outcome.clusters.len(), 2);
//! assert!(outcome.clusters[0].trees().contains("tree2"));
//! ```

use std::collections::{BTreeSet, HashSet};

/// Default minimum number of shared taxa for two clusters to merge
pub const DEFAULT_MIN_OVERLAP: usize = 1;

/// Prefix of cluster folder names
pub const CLUSTER_PREFIX: &str = "cluster";

// =#========================================================================#=
// TREE CLUSTER
// =#========================================================================#=
/// Trees (by identifier) and the union of their taxa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeCluster {
    trees: BTreeSet<String>,
    taxa: HashSet<String>,
}

impl TreeCluster {
    /// Creates a cluster holding a single tree.
    pub fn singleton<S, I, T>(tree: S, taxa: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            trees: BTreeSet::from([tree.into()]),
            taxa: taxa.into_iter().map(Into::into).collect(),
        }
    }

    pub fn trees(&self) -> &BTreeSet<String> {
        &self.trees
    }

    pub fn taxa(&self) -> &HashSet<String> {
        &self.taxa
    }

    pub fn contains(&self, taxon: &str) -> bool {
        self.taxa.contains(taxon)
    }

    /// Returns the number of taxa shared with `other`.
    pub fn overlap(&self, other: &TreeCluster) -> usize {
        let (small, large) = if self.taxa.len() <= other.taxa.len() {
            (&self.taxa, &other.taxa)
        } else {
            (&other.taxa, &self.taxa)
        };
        small.iter().filter(|taxon| large.contains(*taxon)).count()
    }

    /// Returns `true` if at least `min_overlap` taxa are shared with `other`.
    pub fn overlaps(&self, other: &TreeCluster, min_overlap: usize) -> bool {
        self.overlap(other) >= min_overlap
    }

    /// Moves all trees and taxa of `other` into this cluster.
    pub fn merge(&mut self, other: TreeCluster) {
        self.trees.extend(other.trees);
        self.taxa.extend(other.taxa);
    }
}

// =#========================================================================#=
// CLUSTER MERGER
// =#========================================================================#=
/// Clusters after merging, in seed order, and the number of rounds it took
/// (including the final round without merges).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterOutcome {
    pub clusters: Vec<TreeCluster>,
    pub rounds: usize,
}

/// Fixpoint merger of tree clusters.
#[derive(Debug, Clone)]
pub struct ClusterMerger {
    min_overlap: usize,
    clusters: Vec<TreeCluster>,
}

impl Default for ClusterMerger {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_OVERLAP)
    }
}

impl ClusterMerger {
    pub fn new(min_overlap: usize) -> Self {
        Self {
            min_overlap,
            clusters: Vec::new(),
        }
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    /// Seeds a singleton cluster for one tree.
    pub fn add_tree<S, I, T>(&mut self, tree: S, taxa: I)
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.clusters.push(TreeCluster::singleton(tree, taxa));
    }

    /// Returns the number of seeded clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Merges clusters until a round performs no merge.
    ///
    /// Within a round, every pair `i < j` of clusters still present is
    /// compared; on sufficient overlap `j` is merged into `i` and removed at
    /// the end of the round.
    pub fn run(self) -> ClusterOutcome {
        let mut clusters = self.clusters;
        let mut rounds = 0;

        loop {
            rounds += 1;
            let merges = merge_round(&mut clusters, self.min_overlap);
            tracing::info!(round = rounds, merges, clusters = clusters.len(), "Clustering round");
            if merges == 0 {
                break;
            }
        }

        ClusterOutcome { clusters, rounds }
    }
}

/// Runs one round of pairwise merging and returns the number of merges.
fn merge_round(clusters: &mut Vec<TreeCluster>, min_overlap: usize) -> usize {
    let n = clusters.len();
    let mut merged_away = vec![false; n];
    let mut merges = 0;

    for i in 0..n {
        if merged_away[i] {
            continue;
        }
        for j in (i + 1)..n {
            if merged_away[j] || !clusters[i].overlaps(&clusters[j], min_overlap) {
                continue;
            }
            let other = std::mem::take(&mut clusters[j]);
            clusters[i].merge(other);
            merged_away[j] = true;
            merges += 1;
        }
    }

    let mut position = 0;
    clusters.retain(|_| {
        let keep = !merged_away[position];
        position += 1;
        keep
    });
    merges
}

/// Returns the folder name of the cluster at 1-based `position`, zero padded
/// to the number of digits of `count`.
///
/// # Example
/// ```
/// use cladesort::cluster::cluster_name;
///
/// assert_eq!(cluster_name(3, 9), "cluster3");
/// assert_eq!(cluster_name(3, 12), "cluster03");
/// ```
pub fn cluster_name(position: usize, count: usize) -> String {
    let width = count.to_string().len();
    format!("{CLUSTER_PREFIX}{position:0width$}")
}
