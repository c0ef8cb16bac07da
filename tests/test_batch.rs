use cladesort::batch::{
    SortReport, cluster_dir, load_names, load_taxa, parse_groups, parse_named_groups, sort_dir,
    sort_tree, tree_taxa,
};
use cladesort::config::{OnMatchAction, SortConfig};
use cladesort::error::BatchError;
use cladesort::model::TaxonExtractor;
use cladesort::parse_newick_str;
use cladesort::topology::clade::TaxonGroups;
use std::fs;
use std::path::Path;

const MATCHING_TREE: &str = "((HUMAN:1,chimp:1)95:1,(mouse:1,rat:1):1);";
const MIXED_TREE: &str = "((HUMAN:1,mouse:1):1,(chimp:1,rat:1):1);";

fn primate_groups() -> TaxonGroups {
    TaxonGroups::new([vec!["HUMAN"], vec!["chimp"]])
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Input directory with one matching, one non-matching and one broken tree,
/// plus a file that is no tree file.
fn sort_input() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "HUMAN.tre", MATCHING_TREE);
    write(dir.path(), "MOUSE.tre", MIXED_TREE);
    write(dir.path(), "broken.tre", "((HUMAN,chimp);");
    write(dir.path(), "notes.txt", "not a tree");
    dir
}

// --- TESTS GROUPS & NAMES ---
#[test]
fn test_parse_groups() {
    let groups = parse_groups("# primates\nhuman, chimp\tgorilla\n\n  mouse:rat  \n");
    assert_eq!(
        groups,
        vec![vec!["human", "chimp", "gorilla"], vec!["mouse", "rat"]]
    );
}

#[test]
fn test_parse_named_groups() {
    let groups = parse_named_groups("primates human chimp\nrodents: mouse, rat\n");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0, "primates");
    assert_eq!(groups[0].1, vec!["human", "chimp"]);
    assert_eq!(groups[1].0, "rodents");
    assert_eq!(groups[1].1, vec!["mouse", "rat"]);
}

#[test]
fn test_load_names_and_taxa() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "names.txt", "  b \n\nd\n");
    write(dir.path(), "tree.tre", "((a,b),(c,d));");

    let names = load_names(dir.path().join("names.txt")).unwrap();
    assert_eq!(names, vec!["b", "d"]);

    let taxa = tree_taxa(dir.path().join("tree.tre"), &TaxonExtractor::default()).unwrap();
    assert_eq!(taxa.into_iter().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
}

#[test]
fn test_load_taxa_of_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "t1.tre", "((HSAP_1,MMUS_1),_x);");
    write(dir.path(), "t2.tre", "(DMEL_7,HSAP_2);");
    write(dir.path(), "broken.tre", "((HSAP_3,MMUS_2);");
    let extractor = TaxonExtractor::new(r"([A-Z]*)_\w+", 1).unwrap();

    // Blank taxa are dropped, the broken file is skipped
    let taxa = load_taxa(dir.path(), &extractor).unwrap();
    assert_eq!(taxa.into_iter().collect::<Vec<_>>(), ["DMEL", "HSAP", "MMUS"]);
}

#[test]
fn test_load_taxa_of_missing_directory() {
    let result = load_taxa(Path::new("does/not/exist"), &TaxonExtractor::default());
    assert!(matches!(result, Err(BatchError::Io { .. })));
}

#[test]
fn test_load_missing_file() {
    let result = load_names("does/not/exist.txt");
    assert!(matches!(result, Err(BatchError::Io { .. })));
}

// --- TESTS SINGLE TREE SORTING ---
#[test]
fn test_sort_tree_match() {
    let tree = parse_newick_str(MATCHING_TREE).unwrap();
    assert!(sort_tree(&tree, &primate_groups(), &SortConfig::default(), None));

    let mixed = parse_newick_str(MIXED_TREE).unwrap();
    assert!(!sort_tree(&mixed, &primate_groups(), &SortConfig::default(), None));
}

#[test]
fn test_sort_tree_size_filters() {
    let tree = parse_newick_str(MATCHING_TREE).unwrap();
    let groups = primate_groups();

    let too_small = SortConfig::default().with_min_taxa(Some(5));
    assert!(!sort_tree(&tree, &groups, &too_small, None));

    let too_large = SortConfig::default().with_max_taxa(Some(3));
    assert!(!sort_tree(&tree, &groups, &too_large, None));

    let fits = SortConfig::default().with_min_taxa(Some(4)).with_max_taxa(Some(4));
    assert!(sort_tree(&tree, &groups, &fits, None));
}

#[test]
fn test_sort_tree_average_copies() {
    let tree = parse_newick_str("(((HUMAN,HUMAN),chimp),(mouse,rat));").unwrap();
    let groups = primate_groups();

    let strict = SortConfig::default().with_max_average_copies(Some(1.2));
    assert!(!sort_tree(&tree, &groups, &strict, None));

    let lenient = SortConfig::default().with_max_average_copies(Some(1.5));
    assert!(sort_tree(&tree, &groups, &lenient, None));
}

#[test]
fn test_sort_tree_min_support() {
    let tree = parse_newick_str(MATCHING_TREE).unwrap();
    let groups = primate_groups();

    let reached = SortConfig::default().with_min_support(Some(90.0));
    assert!(sort_tree(&tree, &groups, &reached, None));

    let missed = SortConfig::default().with_min_support(Some(99.0));
    assert!(!sort_tree(&tree, &groups, &missed, None));
}

#[test]
fn test_single_leaf_clade_has_no_support() {
    let tree = parse_newick_str(MATCHING_TREE).unwrap();
    let groups = TaxonGroups::new([vec!["HUMAN"]]);

    assert!(sort_tree(&tree, &groups, &SortConfig::default(), None));

    let with_support = SortConfig::default().with_min_support(Some(50.0));
    assert!(!sort_tree(&tree, &groups, &with_support, None));
}

// --- TESTS DIRECTORY SORTING ---
#[test]
fn test_sort_dir_copies_matches() {
    let input = sort_input();
    let output = tempfile::tempdir().unwrap();
    let target = output.path().join("sorted");
    let config = SortConfig::default().with_action(OnMatchAction::Copy);

    let report = sort_dir(input.path(), &target, &primate_groups(), &config).unwrap();

    assert_eq!(
        report,
        SortReport {
            processed: 3,
            matched: 1,
            failed: 1
        }
    );
    assert!(target.join("HUMAN.tre").is_file());
    assert!(!target.join("MOUSE.tre").exists());
    assert!(input.path().join("HUMAN.tre").is_file());
}

#[test]
fn test_sort_dir_moves_matches() {
    let input = sort_input();
    let output = tempfile::tempdir().unwrap();
    let config = SortConfig::default().with_action(OnMatchAction::Move);

    let report = sort_dir(input.path(), output.path(), &primate_groups(), &config).unwrap();

    assert_eq!(report.matched, 1);
    assert!(output.path().join("HUMAN.tre").is_file());
    assert!(!input.path().join("HUMAN.tre").exists());
}

#[test]
fn test_sort_dir_counts_only() {
    let input = sort_input();
    let output = tempfile::tempdir().unwrap();
    let target = output.path().join("never_created");

    let report = sort_dir(input.path(), &target, &primate_groups(), &SortConfig::default())
        .unwrap();

    assert_eq!(report.matched, 1);
    assert!(!target.exists());
}

#[test]
fn test_sort_dir_with_required_query() {
    let input = tempfile::tempdir().unwrap();
    write(input.path(), "HUMAN.tre", MATCHING_TREE);
    write(input.path(), "RAT.tre", MATCHING_TREE);
    let output = tempfile::tempdir().unwrap();

    let config = SortConfig::default().with_matching(
        cladesort::config::MatchConfig::default().with_query_required(true),
    );
    let report = sort_dir(input.path(), output.path(), &primate_groups(), &config).unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.matched, 1);
}

#[cfg(unix)]
#[test]
fn test_sort_dir_skips_non_utf8_file_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let input = tempfile::tempdir().unwrap();
    write(input.path(), "HUMAN.tre", MATCHING_TREE);
    fs::write(input.path().join(OsStr::from_bytes(b"\xffHUMAN.tre")), MATCHING_TREE).unwrap();
    let output = tempfile::tempdir().unwrap();

    let report =
        sort_dir(input.path(), output.path(), &primate_groups(), &SortConfig::default()).unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.matched, 1);
}

#[test]
fn test_sort_missing_dir() {
    let output = tempfile::tempdir().unwrap();
    let result = sort_dir(
        Path::new("does/not/exist"),
        output.path(),
        &primate_groups(),
        &SortConfig::default(),
    );
    assert!(matches!(result, Err(BatchError::Io { .. })));
}

// --- TESTS DIRECTORY CLUSTERING ---
#[test]
fn test_cluster_dir() {
    let input = tempfile::tempdir().unwrap();
    write(input.path(), "t1.tre", "(a,b);");
    write(input.path(), "t2.tre", "(b,c);");
    write(input.path(), "t3.tre", "(d,e);");
    write(input.path(), "bad.tre", "(d,e");
    let output = tempfile::tempdir().unwrap();

    let outcome = cluster_dir(input.path(), output.path(), 1, &TaxonExtractor::default()).unwrap();

    assert_eq!(outcome.clusters.len(), 2);
    assert!(output.path().join("cluster1").join("t1.tre").is_file());
    assert!(output.path().join("cluster1").join("t2.tre").is_file());
    assert!(output.path().join("cluster2").join("t3.tre").is_file());
    assert!(!output.path().join("cluster1").join("bad.tre").exists());
}

#[test]
fn test_cluster_dir_with_unmatched_labels() {
    let input = tempfile::tempdir().unwrap();
    write(input.path(), "t1.tre", "(HSAP_1,odd);");
    write(input.path(), "t2.tre", "(MMUS_1,odd);");
    let output = tempfile::tempdir().unwrap();
    let extractor = TaxonExtractor::new(r"([A-Z]{4})_\d+", 1).unwrap();

    // Unmatched labels count with their whole label, so both trees share "odd"
    let outcome = cluster_dir(input.path(), output.path(), 1, &extractor).unwrap();
    assert_eq!(outcome.clusters.len(), 1);
}
