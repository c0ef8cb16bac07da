//! Extraction of taxon names from leaf labels.
//!
//! Leaf labels often carry more than the taxon, e.g. `Homo_sapiens|ENSG0001`.
//! A [TaxonExtractor] applies a regular expression to the *whole* label and
//! takes one capture group as taxon. What happens on a failed match is
//! controlled by [TaxonFallback].

use crate::model::tree::{NodeIndex, Tree};
use regex::Regex;
use std::collections::BTreeSet;

/// Pattern that takes the whole label as taxon.
pub const DEFAULT_TAXON_PATTERN: &str = "(.+)";

/// Capture group holding the taxon by default.
pub const DEFAULT_TAXON_GROUP: usize = 1;

/// Behavior of [TaxonExtractor::extract] when the pattern does not match a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaxonFallback {
    /// Label has no taxon
    #[default]
    None,
    /// Whole label is the taxon
    Label,
}

/// Regex-driven taxon extraction from leaf labels.
///
/// # Example
/// ```
/// use cladesort::model::TaxonExtractor;
///
/// let extractor = TaxonExtractor::new(r"([A-Za-z]+)_\d+", 1).unwrap();
/// assert_eq!(extractor.extract("human_12"), Some("human"));
/// assert_eq!(extractor.extract("human"), None);
/// ```
#[derive(Debug, Clone)]
pub struct TaxonExtractor {
    /// Pattern anchored at both ends of the label,
    /// `None` for the default pattern (whole non-empty label)
    pattern: Option<Regex>,
    /// Pattern as given by the user
    source: String,
    group: usize,
    fallback: TaxonFallback,
}

impl Default for TaxonExtractor {
    fn default() -> Self {
        Self {
            pattern: None,
            source: DEFAULT_TAXON_PATTERN.to_string(),
            group: DEFAULT_TAXON_GROUP,
            fallback: TaxonFallback::None,
        }
    }
}

impl TaxonExtractor {
    /// Creates an extractor from a pattern that has to match a whole label.
    ///
    /// # Arguments
    /// * `pattern` - Regular expression, implicitly anchored at both ends
    /// * `group` - Capture group holding the taxon
    ///
    /// # Errors
    /// Returns [regex::Error] if the pattern does not compile.
    pub fn new(pattern: &str, group: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Some(Regex::new(&anchored(pattern))?),
            source: pattern.to_string(),
            group,
            fallback: TaxonFallback::None,
        })
    }

    /// Sets the behavior on labels the pattern does not match.
    pub fn with_fallback(mut self, fallback: TaxonFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns the pattern as given to [TaxonExtractor::new].
    pub fn pattern(&self) -> &str {
        &self.source
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn fallback(&self) -> TaxonFallback {
        self.fallback
    }

    /// Returns the taxon encoded in `label`.
    pub fn extract<'a>(&self, label: &'a str) -> Option<&'a str> {
        let captured = match &self.pattern {
            Some(pattern) => pattern
                .captures(label)
                .and_then(|caps| caps.get(self.group))
                .map(|m| m.as_str()),
            None => (!label.is_empty()).then_some(label),
        };

        match (captured, self.fallback) {
            (Some(taxon), _) => Some(taxon),
            (None, TaxonFallback::Label) => Some(label),
            (None, TaxonFallback::None) => None,
        }
    }

    /// Returns the taxon of the leaf at `index`, or `None` for internal nodes.
    pub fn taxon_of<'a>(&self, tree: &'a Tree, index: NodeIndex) -> Option<&'a str> {
        let node = tree.node(index);
        if node.is_leaf() {
            self.extract(node.label())
        } else {
            None
        }
    }

    /// Returns the distinct taxa of all leaves of the tree.
    pub fn taxa(&self, tree: &Tree) -> BTreeSet<String> {
        self.taxa_under(tree, tree.root_index())
    }

    /// Returns the distinct taxa of all leaves under the node at `index`.
    pub fn taxa_under(&self, tree: &Tree, index: NodeIndex) -> BTreeSet<String> {
        tree.leaves_of(index)
            .into_iter()
            .filter_map(|leaf| self.taxon_of(tree, leaf))
            .map(str::to_string)
            .collect()
    }
}

fn anchored(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}
