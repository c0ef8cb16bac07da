//! Explicit configuration values for clade matching and directory sorting.
//!
//! * [MatchConfig] - parameters of the clade-matching engine
//! * [SortConfig] - [MatchConfig] plus the filters and actions of a
//!   directory sort, loadable from a properties file
//!
//! Configuration is always passed explicitly; no algorithm reads ambient state.
//!
//! # Properties format
//! One `key = value` (or `key: value`) per line, `#` and `!` start comments.
//! Values are taken literally. Recognized keys:
//!
//! | Key | Values | Default |
//! |-----|--------|---------|
//! | `phylosort.pattern` | taxon regex, capture group 1 | `(.+)` |
//! | `phylosort.filename.pattern` | file name regex, capture group 1 = query | `(.+)\.tre$` |
//! | `phylosort.mode` | `inclusive` / `exclusive` | `inclusive` |
//! | `phylosort.query.required` | `yes` / `no` | `no` |
//! | `phylosort.root.outgroup` | `yes` / `no` | `yes` |
//! | `phylosort.minimum.group.size` | integer | `1` |
//! | `phylosort.minimum.number.taxa` | integer, negative = off | `-1` |
//! | `phylosort.maximum.number.taxa` | integer, negative = off | `-1` |
//! | `phylosort.minimum.bootstrap.support` | number, negative = off | `-1` |
//! | `phylosort.maximum.average.number.copies` | number, negative = off | `-1` |
//! | `phylosort.on.match.action` | `copy` / `move` / `count` | `count` |
//!
//! # Example
//! ```
//! use cladesort::config::{MatchMode, OnMatchAction, SortConfig};
//!
//! let config = SortConfig::from_properties_str(
//!     "# sort by primates\n\
//!      phylosort.mode = exclusive\n\
//!      phylosort.minimum.number.taxa: 4\n\
//!      phylosort.on.match.action = copy\n",
//! ).unwrap();
//! assert_eq!(config.matching().mode(), MatchMode::Exclusive);
//! assert_eq!(config.min_taxa(), Some(4));
//! assert_eq!(config.action(), OnMatchAction::Copy);
//! ```

use crate::error::ConfigError;
use crate::model::TaxonExtractor;
use crate::model::taxon::DEFAULT_TAXON_GROUP;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Name of the configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "phylosort.config";

/// Default pattern extracting the query from a tree file name
pub const DEFAULT_FILENAME_PATTERN: &str = r"(.+)\.tre$";

/// File extension matched by [DEFAULT_FILENAME_PATTERN]
const DEFAULT_TREE_EXTENSION: &str = ".tre";

/// Default minimum number of representatives per group
pub const DEFAULT_MIN_GROUP_SIZE: usize = 1;

const KEY_PATTERN: &str = "phylosort.pattern";
const KEY_FILENAME_PATTERN: &str = "phylosort.filename.pattern";
const KEY_QUERY_REQUIRED: &str = "phylosort.query.required";
const KEY_ROOT_OUTGROUP: &str = "phylosort.root.outgroup";
const KEY_MODE: &str = "phylosort.mode";
const KEY_MIN_GROUP_SIZE: &str = "phylosort.minimum.group.size";
const KEY_MIN_TAXA: &str = "phylosort.minimum.number.taxa";
const KEY_MAX_TAXA: &str = "phylosort.maximum.number.taxa";
const KEY_MIN_SUPPORT: &str = "phylosort.minimum.bootstrap.support";
const KEY_MAX_AVERAGE_COPIES: &str = "phylosort.maximum.average.number.copies";
const KEY_ON_MATCH_ACTION: &str = "phylosort.on.match.action";

// =#========================================================================#=
// MATCH CONFIG
// =#========================================================================#=
/// Clade matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Climb from each leaf to the lowest clade of union taxa that covers
    /// every group at least `min_group_size` times
    #[default]
    Inclusive,
    /// LCA of all union leaves, accepted only if it holds no foreign taxa
    Exclusive,
}

impl FromStr for MatchMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("inclusive") {
            Ok(MatchMode::Inclusive)
        } else if s.eq_ignore_ascii_case("exclusive") {
            Ok(MatchMode::Exclusive)
        } else {
            Err(())
        }
    }
}

/// Parameters of the clade-matching engine.
///
/// # Construction
/// Start from [MatchConfig::default] and adjust with the `with_*` methods:
/// ```
/// use cladesort::config::{MatchConfig, MatchMode};
///
/// let config = MatchConfig::default()
///     .with_mode(MatchMode::Exclusive)
///     .with_query_required(true);
/// assert_eq!(config.min_group_size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MatchConfig {
    mode: MatchMode,
    min_group_size: usize,
    query_required: bool,
    extractor: TaxonExtractor,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::default(),
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            query_required: false,
            extractor: TaxonExtractor::default(),
        }
    }
}

impl MatchConfig {
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the minimum number of leaves per group an inclusive match must hold.
    pub fn with_min_group_size(mut self, min_group_size: usize) -> Self {
        self.min_group_size = min_group_size;
        self
    }

    /// Sets whether accepted clades must contain the query leaf.
    pub fn with_query_required(mut self, query_required: bool) -> Self {
        self.query_required = query_required;
        self
    }

    /// Sets how taxa are derived from leaf labels.
    pub fn with_extractor(mut self, extractor: TaxonExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn min_group_size(&self) -> usize {
        self.min_group_size
    }

    pub fn query_required(&self) -> bool {
        self.query_required
    }

    pub fn extractor(&self) -> &TaxonExtractor {
        &self.extractor
    }
}

// =#========================================================================#=
// SORT CONFIG
// =#========================================================================#=
/// What to do with a tree file that has a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnMatchAction {
    Copy,
    Move,
    /// Only count matches, leave files untouched
    #[default]
    Count,
}

impl FromStr for OnMatchAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "copy" => Ok(OnMatchAction::Copy),
            "move" => Ok(OnMatchAction::Move),
            "count" => Ok(OnMatchAction::Count),
            _ => Err(()),
        }
    }
}

/// Configuration of a directory sort.
///
/// Numeric filters are `None` when disabled; in properties files a negative
/// value disables a filter.
#[derive(Debug, Clone)]
pub struct SortConfig {
    matching: MatchConfig,
    /// Full-match file name pattern, `None` for [DEFAULT_FILENAME_PATTERN]
    filename_pattern: Option<TaxonExtractor>,
    root_outgroup: bool,
    min_taxa: Option<usize>,
    max_taxa: Option<usize>,
    min_support: Option<f64>,
    max_average_copies: Option<f64>,
    action: OnMatchAction,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            matching: MatchConfig::default(),
            filename_pattern: None,
            root_outgroup: true,
            min_taxa: None,
            max_taxa: None,
            min_support: None,
            max_average_copies: None,
            action: OnMatchAction::default(),
        }
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl SortConfig {
    pub fn with_matching(mut self, matching: MatchConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Sets the file name pattern; capture group 1 holds the query taxon.
    ///
    /// # Errors
    /// Returns [ConfigError::InvalidPattern] if the pattern does not compile.
    pub fn with_filename_pattern(mut self, pattern: &str) -> Result<Self, ConfigError> {
        let extractor =
            TaxonExtractor::new(pattern, 1).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        self.filename_pattern = Some(extractor);
        Ok(self)
    }

    /// Sets whether trees are rerooted at the first leaf outside the groups.
    pub fn with_root_outgroup(mut self, root_outgroup: bool) -> Self {
        self.root_outgroup = root_outgroup;
        self
    }

    pub fn with_min_taxa(mut self, min_taxa: Option<usize>) -> Self {
        self.min_taxa = min_taxa;
        self
    }

    pub fn with_max_taxa(mut self, max_taxa: Option<usize>) -> Self {
        self.max_taxa = max_taxa;
        self
    }

    pub fn with_min_support(mut self, min_support: Option<f64>) -> Self {
        self.min_support = min_support;
        self
    }

    pub fn with_max_average_copies(mut self, max_average_copies: Option<f64>) -> Self {
        self.max_average_copies = max_average_copies;
        self
    }

    pub fn with_action(mut self, action: OnMatchAction) -> Self {
        self.action = action;
        self
    }

    pub fn matching(&self) -> &MatchConfig {
        &self.matching
    }

    pub fn filename_pattern(&self) -> &str {
        self.filename_pattern
            .as_ref()
            .map_or(DEFAULT_FILENAME_PATTERN, TaxonExtractor::pattern)
    }

    pub fn root_outgroup(&self) -> bool {
        self.root_outgroup
    }

    pub fn min_taxa(&self) -> Option<usize> {
        self.min_taxa
    }

    pub fn max_taxa(&self) -> Option<usize> {
        self.max_taxa
    }

    pub fn min_support(&self) -> Option<f64> {
        self.min_support
    }

    pub fn max_average_copies(&self) -> Option<f64> {
        self.max_average_copies
    }

    pub fn action(&self) -> OnMatchAction {
        self.action
    }

    /// Returns the query encoded in a file name (capture group 1 of the file
    /// name pattern, which has to match the whole name), or `None` if the
    /// name does not match.
    pub fn query_from_filename<'a>(&self, filename: &'a str) -> Option<&'a str> {
        match &self.filename_pattern {
            Some(extractor) => extractor.extract(filename),
            None => filename
                .strip_suffix(DEFAULT_TREE_EXTENSION)
                .filter(|query| !query.is_empty() && !query.contains('\n')),
        }
    }
}

// ============================================================================
// Loading (pub)
// ============================================================================
impl SortConfig {
    /// Reads a configuration from a properties file.
    ///
    /// # Errors
    /// Returns [ConfigError::Io] if the file cannot be read, otherwise see
    /// [SortConfig::from_properties_str].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loading configuration");
        Self::from_properties_str(&text)
    }

    /// Builds a configuration from properties text, starting from defaults.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    /// Returns [ConfigError::InvalidValue] for a value outside its domain and
    /// [ConfigError::InvalidPattern] for a pattern that does not compile.
    pub fn from_properties_str(text: &str) -> Result<Self, ConfigError> {
        let properties = parse_properties(text);
        let mut config = SortConfig::default();
        let mut matching = MatchConfig::default();

        if let Some(value) = properties.get(KEY_MODE) {
            let mode = value.parse().map_err(|_| invalid(KEY_MODE, value))?;
            matching = matching.with_mode(mode);
        }
        if let Some(value) = properties.get(KEY_QUERY_REQUIRED) {
            matching = matching.with_query_required(parse_yes_no(KEY_QUERY_REQUIRED, value)?);
        }
        if let Some(value) = properties.get(KEY_MIN_GROUP_SIZE) {
            let size = value
                .parse::<usize>()
                .map_err(|_| invalid(KEY_MIN_GROUP_SIZE, value))?;
            matching = matching.with_min_group_size(size);
        }
        if let Some(value) = properties.get(KEY_PATTERN) {
            let extractor = TaxonExtractor::new(value, DEFAULT_TAXON_GROUP).map_err(|source| {
                ConfigError::InvalidPattern {
                    pattern: value.clone(),
                    source,
                }
            })?;
            matching = matching.with_extractor(extractor);
        }
        config = config.with_matching(matching);

        if let Some(value) = properties.get(KEY_FILENAME_PATTERN) {
            config = config.with_filename_pattern(value)?;
        }
        if let Some(value) = properties.get(KEY_ROOT_OUTGROUP) {
            config = config.with_root_outgroup(parse_yes_no(KEY_ROOT_OUTGROUP, value)?);
        }
        if let Some(value) = properties.get(KEY_ON_MATCH_ACTION) {
            let action = value.parse().map_err(|_| invalid(KEY_ON_MATCH_ACTION, value))?;
            config = config.with_action(action);
        }
        if let Some(value) = properties.get(KEY_MIN_TAXA) {
            config = config.with_min_taxa(parse_count_filter(KEY_MIN_TAXA, value)?);
        }
        if let Some(value) = properties.get(KEY_MAX_TAXA) {
            config = config.with_max_taxa(parse_count_filter(KEY_MAX_TAXA, value)?);
        }
        if let Some(value) = properties.get(KEY_MIN_SUPPORT) {
            config = config.with_min_support(parse_value_filter(KEY_MIN_SUPPORT, value)?);
        }
        if let Some(value) = properties.get(KEY_MAX_AVERAGE_COPIES) {
            config = config
                .with_max_average_copies(parse_value_filter(KEY_MAX_AVERAGE_COPIES, value)?);
        }

        Ok(config)
    }

    /// Loads `path` if given, else [DEFAULT_CONFIG_FILE] in the working
    /// directory if present, else the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

// ============================================================================
// Helper (private)
// ============================================================================
fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_yes_no(key: &str, value: &str) -> Result<bool, ConfigError> {
    if value.eq_ignore_ascii_case("yes") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("no") {
        Ok(false)
    } else {
        Err(invalid(key, value))
    }
}

/// Parses an integer filter; negative values disable it.
fn parse_count_filter(key: &str, value: &str) -> Result<Option<usize>, ConfigError> {
    let number = value.parse::<i64>().map_err(|_| invalid(key, value))?;
    Ok(usize::try_from(number).ok())
}

/// Parses a numeric filter; negative values disable it.
fn parse_value_filter(key: &str, value: &str) -> Result<Option<f64>, ConfigError> {
    let number = value.parse::<f64>().map_err(|_| invalid(key, value))?;
    Ok((number >= 0.0).then_some(number))
}

/// Splits properties text into trimmed key/value pairs.
/// Later keys overwrite earlier ones.
fn parse_properties(text: &str) -> HashMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let split = line.find(['=', ':'])?;
            let key = line[..split].trim();
            let value = line[split + 1..].trim();
            (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}
