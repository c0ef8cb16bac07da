//! Batch processing of tree directories.
//!
//! This layer consumes the core only through its public operations:
//! [parse_file](crate::newick::parse_file), [reroot], [all_monophyletic_nodes],
//! the [transform](crate::topology::transform) statistics and the
//! [ClusterMerger]. Failures on single files are logged and skipped; only
//! failures on the directories themselves abort a run.

use crate::cluster::{ClusterMerger, ClusterOutcome, cluster_name};
use crate::config::{OnMatchAction, SortConfig};
use crate::error::BatchError;
use crate::model::{TaxonExtractor, TaxonFallback, Tree};
use crate::newick;
use crate::topology::clade::{TaxonGroups, all_monophyletic_nodes};
use crate::topology::reroot::reroot;
use crate::topology::transform::{average_copies, find_outgroup, support};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Characters separating taxa in a groups file
const GROUP_SEPARATORS: &[char] = &[',', ' ', '\t', ':'];

/// Starts a comment line in a groups file
const COMMENT_PREFIX: char = '#';

// ============================================================================
// Groups & name lists (pub)
// ============================================================================
/// Parses groups text: one group per line, taxa separated by any of
/// `, \t:`. Empty lines and lines starting with `#` are ignored.
///
/// # Example
/// ```
/// use cladesort::batch::parse_groups;
///
/// let groups = parse_groups("# primates\nhuman, chimp\n\nmouse:rat\n");
/// assert_eq!(groups, vec![vec!["human", "chimp"], vec!["mouse", "rat"]]);
/// ```
pub fn parse_groups(text: &str) -> Vec<Vec<String>> {
    group_lines(text).collect()
}

/// Parses named groups text: like [parse_groups], but the first token of
/// each line names the group.
pub fn parse_named_groups(text: &str) -> Vec<(String, Vec<String>)> {
    group_lines(text)
        .filter_map(|mut tokens| {
            if tokens.is_empty() {
                return None;
            }
            let name = tokens.remove(0);
            Some((name, tokens))
        })
        .collect()
}

/// Reads and parses a groups file, see [parse_groups].
pub fn load_groups<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>, BatchError> {
    Ok(parse_groups(&read(path.as_ref())?))
}

/// Reads and parses a named groups file, see [parse_named_groups].
pub fn load_named_groups<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<(String, Vec<String>)>, BatchError> {
    Ok(parse_named_groups(&read(path.as_ref())?))
}

/// Reads one name per non-empty line, trimmed.
pub fn load_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>, BatchError> {
    Ok(read(path.as_ref())?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Returns the distinct leaf taxa of the tree in a file.
pub fn tree_taxa<P: AsRef<Path>>(
    path: P,
    extractor: &TaxonExtractor,
) -> Result<BTreeSet<String>, BatchError> {
    let tree = newick::parse_file(path)?;
    Ok(extractor.taxa(&tree))
}

/// Returns the union of the leaf taxa of all files in a directory, sorted.
///
/// Blank taxa are dropped. Files that fail to parse are logged and skipped.
///
/// # Errors
/// Returns [BatchError::Io] if the directory cannot be listed.
pub fn load_taxa(
    dir: &Path,
    extractor: &TaxonExtractor,
) -> Result<BTreeSet<String>, BatchError> {
    let mut taxa = BTreeSet::new();
    for path in tree_files(dir)? {
        tracing::debug!(file = %path.display(), "Loading taxa");
        match newick::parse_file(&path) {
            Ok(tree) => taxa.extend(
                extractor
                    .taxa(&tree)
                    .into_iter()
                    .filter(|taxon| !taxon.trim().is_empty()),
            ),
            Err(e) => tracing::warn!(file = %path.display(), error = %e, "Failed loading taxa"),
        }
    }

    if taxa.is_empty() {
        tracing::warn!(dir = %dir.display(), "No taxa found");
    }
    Ok(taxa)
}

// ============================================================================
// Sorting (pub)
// ============================================================================
/// Counts of one directory sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortReport {
    /// Files whose name matched the file name pattern
    pub processed: usize,
    /// Files with an accepted clade
    pub matched: usize,
    /// Files that could not be read, parsed or copied/moved
    pub failed: usize,
}

/// Decides whether a tree has an accepted clade for the groups.
///
/// Steps:
/// 1. Leaf count and average copy number filters of `config`
/// 2. Rerooting at the first leaf outside the groups, if configured
/// 3. Enumeration of all monophyletic clades
/// 4. If a minimum support is configured, some clade must reach it
///    (a single-leaf clade has support 0)
pub fn sort_tree(
    tree: &Tree,
    groups: &TaxonGroups,
    config: &SortConfig,
    query: Option<&str>,
) -> bool {
    let matching = config.matching();
    let extractor = matching.extractor();

    let size = tree.size();
    if config.min_taxa().is_some_and(|min| size < min)
        || config.max_taxa().is_some_and(|max| size > max)
    {
        tracing::debug!(size, "Tree size outside limits");
        return false;
    }

    if let Some(max) = config.max_average_copies() {
        let copies = average_copies(tree, extractor);
        if copies > max {
            tracing::debug!(copies, "Too many copies per taxon");
            return false;
        }
    }

    let rerooted;
    let tree = match config
        .root_outgroup()
        .then(|| find_outgroup(tree, extractor, groups.union()))
        .flatten()
    {
        Some(outgroup) => {
            rerooted = reroot(tree, outgroup);
            &rerooted
        }
        None => tree,
    };

    let clades = all_monophyletic_nodes(tree, groups, matching, query);
    match config.min_support() {
        None => !clades.is_empty(),
        Some(min) => clades.into_iter().any(|clade| {
            let value = if tree[clade].is_leaf() {
                tracing::warn!("Matching clade is a single leaf without support");
                0.0
            } else {
                support(tree, clade).unwrap_or_else(|| {
                    tracing::warn!(label = tree[clade].label(), "Failed parsing support");
                    0.0
                })
            };
            value >= min
        }),
    }
}

/// Sorts all tree files of `input` whose name matches the file name pattern.
///
/// Capture group 1 of the file name pattern is the query taxon. Matching
/// files are copied or moved to `output`, or only counted, depending on the
/// configured [OnMatchAction].
///
/// # Errors
/// Returns [BatchError::Io] if `input` cannot be listed or `output` cannot be
/// created. Failures on single files are counted in [SortReport::failed].
pub fn sort_dir(
    input: &Path,
    output: &Path,
    groups: &TaxonGroups,
    config: &SortConfig,
) -> Result<SortReport, BatchError> {
    if groups.is_empty() {
        tracing::warn!("Empty taxon groups");
    }
    if config.action() != OnMatchAction::Count {
        fs::create_dir_all(output).map_err(|e| BatchError::io(output, e))?;
    }

    let files = tree_files(input)?;
    let total = files.len();
    let mut report = SortReport::default();
    tracing::info!(input = %input.display(), total, "Started sorting trees");

    for path in files {
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            tracing::debug!(file = %path.display(), "File name is not UTF-8");
            continue;
        };
        let Some(query) = config.query_from_filename(filename) else {
            tracing::debug!(filename, "File name does not match pattern");
            continue;
        };

        report.processed += 1;
        tracing::info!("{} / {}: {}", report.processed, total, filename);

        let tree = match newick::parse_file(&path) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping tree");
                report.failed += 1;
                continue;
            }
        };

        if !sort_tree(&tree, groups, config, Some(query)) {
            continue;
        }

        report.matched += 1;
        let destination = output.join(filename);
        if let Err(e) = apply_action(config.action(), &path, &destination) {
            tracing::warn!(error = %e, "Failed handling matching tree");
            report.failed += 1;
        }
    }

    tracing::info!(
        processed = report.processed,
        matched = report.matched,
        failed = report.failed,
        "Finished sorting trees"
    );
    Ok(report)
}

// ============================================================================
// Clustering (pub)
// ============================================================================
/// Clusters all tree files of `input` by shared leaf taxa and copies the
/// members of each cluster into a `clusterNN` folder below `output`.
///
/// Leaves whose label does not match the taxon pattern count with their
/// whole label.
///
/// # Errors
/// Returns [BatchError::Io] on directory failures or when copying fails.
/// Trees that fail to parse are logged and left out.
pub fn cluster_dir(
    input: &Path,
    output: &Path,
    min_overlap: usize,
    extractor: &TaxonExtractor,
) -> Result<ClusterOutcome, BatchError> {
    let extractor = extractor.clone().with_fallback(TaxonFallback::Label);
    let mut merger = ClusterMerger::new(min_overlap);

    tracing::info!(input = %input.display(), "Started clustering trees");
    for path in tree_files(input)? {
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            tracing::debug!(file = %path.display(), "File name is not UTF-8");
            continue;
        };
        match newick::parse_file(&path) {
            Ok(tree) => merger.add_tree(filename, extractor.taxa(&tree)),
            Err(e) => tracing::warn!(error = %e, "Skipping tree"),
        }
    }

    let num_trees = merger.len();
    let outcome = merger.run();
    tracing::info!(
        trees = num_trees,
        clusters = outcome.clusters.len(),
        rounds = outcome.rounds,
        "Finished clustering trees"
    );

    let count = outcome.clusters.len();
    for (position, cluster) in outcome.clusters.iter().enumerate() {
        let dir = output.join(cluster_name(position + 1, count));
        fs::create_dir_all(&dir).map_err(|e| BatchError::io(&dir, e))?;
        for tree in cluster.trees() {
            let destination = dir.join(tree);
            fs::copy(input.join(tree), &destination)
                .map_err(|e| BatchError::io(&destination, e))?;
        }
    }

    Ok(outcome)
}

// ============================================================================
// Helper (private)
// ============================================================================
fn read(path: &Path) -> Result<String, BatchError> {
    fs::read_to_string(path).map_err(|e| BatchError::io(path, e))
}

/// Splits non-comment lines into tokens.
fn group_lines(text: &str) -> impl Iterator<Item = Vec<String>> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(|line| {
            line.split(GROUP_SEPARATORS)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect()
        })
}

/// Lists the regular files of a directory, sorted by name.
fn tree_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let entries = fs::read_dir(dir).map_err(|e| BatchError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BatchError::io(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn apply_action(action: OnMatchAction, source: &Path, destination: &Path) -> Result<(), BatchError> {
    match action {
        OnMatchAction::Count => Ok(()),
        OnMatchAction::Copy => fs::copy(source, destination)
            .map(|_| ())
            .map_err(|e| BatchError::io(destination, e)),
        OnMatchAction::Move => {
            if fs::rename(source, destination).is_ok() {
                return Ok(());
            }
            // Rename fails across file systems
            fs::copy(source, destination).map_err(|e| BatchError::io(destination, e))?;
            fs::remove_file(source).map_err(|e| BatchError::io(source, e))
        }
    }
}
