//! Monophyletic clade matching against taxon groups.
//!
//! Given groups of taxa (e.g. `{human, chimp}`, `{mouse}`), a clade matches
//! when its leaves are drawn from the union of all groups and every group is
//! represented. Two rules exist, selected by [MatchMode]:
//!
//! * **Exclusive**: the LCA of all leaves with a union taxon is the only
//!   candidate. It matches if it holds no foreign taxa and every group has at
//!   least one leaf under it.
//! * **Inclusive**: from every union leaf, climb towards the root and accept
//!   the lowest ancestor that holds only union taxa and at least
//!   `min_group_size` leaves of every group. Climbs stop at ancestors that
//!   hold foreign taxa and at nodes already visited by an earlier climb.
//!
//! When all matches are enumerated, an exclusive match is decomposed by
//! inclusive matching restricted to the subtree of the LCA.
//!
//! If the configuration requires the query, clades without a leaf labeled
//! like the query (ignoring ASCII case) are discarded. No match is a normal
//! outcome, reported as `None` or an empty `Vec`.
//!
//! # Example
//! ```
//! use cladesort::config::{MatchConfig, MatchMode};
//! use cladesort::parse_newick_str;
//! use cladesort::topology::clade::{TaxonGroups, monophyletic_node};
//!
//! let tree = parse_newick_str("(((a,b),c),(e,d));").unwrap();
//! let groups = TaxonGroups::new([vec!["a"], vec!["b"], vec!["c"]]);
//! let config = MatchConfig::default().with_mode(MatchMode::Exclusive);
//!
//! let clade = monophyletic_node(&tree, &groups, &config, None).unwrap();
//! assert_eq!(tree.size_of(clade), 3);
//! ```

use crate::config::{MatchConfig, MatchMode};
use crate::model::{NodeIndex, Tree};
use crate::topology::lca::lca_node;
use std::collections::HashSet;

// =#========================================================================#=
// TAXON GROUPS
// =#========================================================================#=
/// Groups of taxa to match, together with their union.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonGroups {
    groups: Vec<HashSet<String>>,
    union: HashSet<String>,
}

impl TaxonGroups {
    /// Creates groups from any nested collection of taxon names.
    pub fn new<I, G, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups: Vec<HashSet<String>> = groups
            .into_iter()
            .map(|group| group.into_iter().map(Into::into).collect())
            .collect();
        let union = groups.iter().flatten().cloned().collect();
        Self { groups, union }
    }

    /// Returns the individual groups.
    pub fn groups(&self) -> &[HashSet<String>] {
        &self.groups
    }

    /// Returns the union of all groups.
    pub fn union(&self) -> &HashSet<String> {
        &self.union
    }

    /// Returns `true` if `taxon` is in any group.
    pub fn contains(&self, taxon: &str) -> bool {
        self.union.contains(taxon)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// ============================================================================
// Matching (pub)
// ============================================================================
/// Returns the first monophyletic clade of the groups, or `None`.
///
/// # Arguments
/// * `tree` - Tree to search
/// * `groups` - Taxon groups that have to be represented
/// * `config` - Mode, minimum group size, query requirement and taxon extraction
/// * `query` - Leaf label an accepted clade must contain if `config`
///   requires the query; `None` always passes
pub fn monophyletic_node(
    tree: &Tree,
    groups: &TaxonGroups,
    config: &MatchConfig,
    query: Option<&str>,
) -> Option<NodeIndex> {
    let matcher = Matcher::new(tree, groups, config, query);
    match config.mode() {
        MatchMode::Exclusive => matcher.exclusive_candidate(),
        MatchMode::Inclusive => matcher
            .inclusive_matches(tree.root_index())
            .into_iter()
            .next(),
    }
}

/// Returns all monophyletic clades of the groups in discovery order,
/// without duplicates.
///
/// In exclusive mode the exclusive clade is decomposed into its inclusive
/// matches. See [monophyletic_node] for the arguments.
///
/// # Example
/// ```
/// use cladesort::config::MatchConfig;
/// use cladesort::parse_newick_str;
/// use cladesort::topology::clade::{TaxonGroups, all_monophyletic_nodes};
///
/// let tree = parse_newick_str("(((a1,b1),x),((a2,b2),y));").unwrap();
/// let groups = TaxonGroups::new([vec!["a1", "a2"], vec!["b1", "b2"]]);
///
/// let clades = all_monophyletic_nodes(&tree, &groups, &MatchConfig::default(), None);
/// assert_eq!(clades.len(), 2);
/// ```
pub fn all_monophyletic_nodes(
    tree: &Tree,
    groups: &TaxonGroups,
    config: &MatchConfig,
    query: Option<&str>,
) -> Vec<NodeIndex> {
    let matcher = Matcher::new(tree, groups, config, query);
    match config.mode() {
        MatchMode::Exclusive => match matcher.exclusive_candidate() {
            Some(lca) => matcher.inclusive_matches(lca),
            None => Vec::new(),
        },
        MatchMode::Inclusive => matcher.inclusive_matches(tree.root_index()),
    }
}

/// Returns `true` if a leaf under `node` is labeled `query`, ignoring
/// ASCII case. An absent query is always present.
pub fn contains_query(tree: &Tree, node: NodeIndex, query: Option<&str>) -> bool {
    let Some(query) = query else {
        return true;
    };
    tree.leaves_of(node)
        .into_iter()
        .any(|leaf| tree[leaf].label().eq_ignore_ascii_case(query))
}

// =#========================================================================#=
// MATCHER (private)
// =#========================================================================#=
/// One matching run over a tree.
struct Matcher<'a> {
    tree: &'a Tree,
    groups: &'a TaxonGroups,
    config: &'a MatchConfig,
    query: Option<&'a str>,
}

impl<'a> Matcher<'a> {
    fn new(
        tree: &'a Tree,
        groups: &'a TaxonGroups,
        config: &'a MatchConfig,
        query: Option<&'a str>,
    ) -> Self {
        Self {
            tree,
            groups,
            config,
            query,
        }
    }

    /// Exclusive rule: LCA of the union leaves, if it qualifies.
    fn exclusive_candidate(&self) -> Option<NodeIndex> {
        let leaves = self.union_leaves(self.tree.root_index());
        if leaves.is_empty() {
            return None;
        }

        let lca = lca_node(self.tree, &leaves)?;
        let qualifies = self.belongs(lca) && self.covers(lca, 1) && self.has_query(lca);
        qualifies.then_some(lca)
    }

    /// Inclusive rule, climbing from the union leaves under `boundary`
    /// but never above it.
    fn inclusive_matches(&self, boundary: NodeIndex) -> Vec<NodeIndex> {
        let mut visited = HashSet::new();
        let mut matches = Vec::new();
        for leaf in self.union_leaves(boundary) {
            if let Some(clade) = self.climb(leaf, boundary, &mut visited)
                && self.has_query(clade)
            {
                matches.push(clade);
            }
        }
        matches
    }

    /// Climbs from `start` to the lowest qualifying ancestor.
    ///
    /// Nodes with foreign taxa, the boundary failing the coverage test and
    /// accepted nodes are marked visited; reaching a visited node ends the climb.
    fn climb(
        &self,
        start: NodeIndex,
        boundary: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
    ) -> Option<NodeIndex> {
        let mut node = start;
        loop {
            if visited.contains(&node) {
                return None;
            }

            if !self.belongs(node) {
                visited.insert(node);
                return None;
            }

            if self.covers(node, self.config.min_group_size()) {
                visited.insert(node);
                return Some(node);
            }

            match self.tree[node].parent() {
                Some(parent) if node != boundary => node = parent,
                _ => {
                    visited.insert(node);
                    return None;
                }
            }
        }
    }

    /// Leaves under `node` (pre-order) whose taxon is in the union.
    fn union_leaves(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let extractor = self.config.extractor();
        self.tree
            .leaves_of(node)
            .into_iter()
            .filter(|&leaf| {
                extractor
                    .taxon_of(self.tree, leaf)
                    .is_some_and(|taxon| self.groups.contains(taxon))
            })
            .collect()
    }

    /// Every leaf under `node` has a union taxon.
    fn belongs(&self, node: NodeIndex) -> bool {
        let extractor = self.config.extractor();
        self.tree.leaves_of(node).into_iter().all(|leaf| {
            extractor
                .taxon_of(self.tree, leaf)
                .is_some_and(|taxon| self.groups.contains(taxon))
        })
    }

    /// Every group has at least `min_size` leaves under `node`.
    fn covers(&self, node: NodeIndex, min_size: usize) -> bool {
        let extractor = self.config.extractor();
        let taxa: Vec<&str> = self
            .tree
            .leaves_of(node)
            .into_iter()
            .filter_map(|leaf| extractor.taxon_of(self.tree, leaf))
            .collect();

        self.groups.groups().iter().all(|group| {
            taxa.iter().filter(|taxon| group.contains(**taxon)).count() >= min_size
        })
    }

    fn has_query(&self, node: NodeIndex) -> bool {
        !self.config.query_required() || contains_query(self.tree, node, self.query)
    }
}
