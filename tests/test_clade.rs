use cladesort::config::{MatchConfig, MatchMode};
use cladesort::model::TaxonExtractor;
use cladesort::parse_newick_str;
use cladesort::topology::clade::{
    TaxonGroups, all_monophyletic_nodes, contains_query, monophyletic_node,
};

fn exclusive() -> MatchConfig {
    MatchConfig::default().with_mode(MatchMode::Exclusive)
}

fn labels_under(tree: &cladesort::model::Tree, node: usize) -> Vec<String> {
    let mut labels: Vec<String> = tree
        .leaves_of(node)
        .into_iter()
        .map(|leaf| tree[leaf].label().to_string())
        .collect();
    labels.sort();
    labels
}

// --- TESTS TAXON GROUPS ---
#[test]
fn test_taxon_groups_union() {
    let groups = TaxonGroups::new([vec!["a", "b"], vec!["b", "c"]]);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.union().len(), 3);
    assert!(groups.contains("c"));
    assert!(!groups.contains("d"));
    assert!(TaxonGroups::default().is_empty());
}

// --- TESTS EXCLUSIVE MODE ---
#[test]
fn test_exclusive_match() {
    let tree = parse_newick_str("(((a,b),c),(e,d));").unwrap();
    let groups = TaxonGroups::new([vec!["a"], vec!["b"], vec!["c"]]);

    let clade = monophyletic_node(&tree, &groups, &exclusive(), None).unwrap();
    assert_eq!(labels_under(&tree, clade), ["a", "b", "c"]);
}

#[test]
fn test_exclusive_rejects_missing_group() {
    let tree = parse_newick_str("(((a,b),x),(e,d));").unwrap();
    let groups = TaxonGroups::new([vec!["a"], vec!["b"], vec!["c"]]);

    assert!(monophyletic_node(&tree, &groups, &exclusive(), None).is_none());
    assert!(all_monophyletic_nodes(&tree, &groups, &exclusive(), None).is_empty());
}

#[test]
fn test_exclusive_rejects_foreign_taxon() {
    let tree = parse_newick_str("((((a,b),e),c),d);").unwrap();
    let groups = TaxonGroups::new([vec!["a"], vec!["b"], vec!["c"]]);

    assert!(monophyletic_node(&tree, &groups, &exclusive(), None).is_none());
}

#[test]
fn test_exclusive_without_union_leaves() {
    let tree = parse_newick_str("((x,y),z);").unwrap();
    let groups = TaxonGroups::new([vec!["a"]]);
    assert!(monophyletic_node(&tree, &groups, &exclusive(), None).is_none());
}

#[test]
fn test_exclusive_decomposes_into_inclusive_matches() {
    let tree = parse_newick_str("((((a1,b1),(a2,b2)),c),d);").unwrap();
    let groups = TaxonGroups::new([vec!["a1", "a2"], vec!["b1", "b2"]]);

    let clades = all_monophyletic_nodes(&tree, &groups, &exclusive(), None);
    assert_eq!(clades.len(), 2);
    assert_eq!(labels_under(&tree, clades[0]), ["a1", "b1"]);
    assert_eq!(labels_under(&tree, clades[1]), ["a2", "b2"]);
}

// --- TESTS INCLUSIVE MODE ---
#[test]
fn test_inclusive_finds_all_clades() {
    let tree = parse_newick_str("(((a1,b1),x),((a2,b2),y));").unwrap();
    let groups = TaxonGroups::new([vec!["a1", "a2"], vec!["b1", "b2"]]);
    let config = MatchConfig::default();

    let clades = all_monophyletic_nodes(&tree, &groups, &config, None);
    assert_eq!(clades.len(), 2);
    assert_eq!(labels_under(&tree, clades[0]), ["a1", "b1"]);
    assert_eq!(labels_under(&tree, clades[1]), ["a2", "b2"]);

    let first = monophyletic_node(&tree, &groups, &config, None).unwrap();
    assert_eq!(first, clades[0]);
}

#[test]
fn test_inclusive_stops_at_foreign_taxa() {
    let tree = parse_newick_str("((a,x),b);").unwrap();
    let groups = TaxonGroups::new([vec!["a"], vec!["b"]]);
    assert!(monophyletic_node(&tree, &groups, &MatchConfig::default(), None).is_none());
}

#[test]
fn test_inclusive_returns_lowest_clade() {
    let tree = parse_newick_str("(((a,b),(a,c)),x);").unwrap();
    let groups = TaxonGroups::new([vec!["a"], vec!["b", "c"]]);

    let clades = all_monophyletic_nodes(&tree, &groups, &MatchConfig::default(), None);
    assert_eq!(clades.len(), 2);
    assert!(clades.iter().all(|&clade| tree.size_of(clade) == 2));
}

#[test]
fn test_inclusive_min_group_size() {
    let tree = parse_newick_str("(((a,b),(a,b)),x);").unwrap();
    let groups = TaxonGroups::new([vec!["a"], vec!["b"]]);
    let config = MatchConfig::default().with_min_group_size(2);

    let clades = all_monophyletic_nodes(&tree, &groups, &config, None);
    assert_eq!(clades.len(), 1);
    assert_eq!(tree.size_of(clades[0]), 4);
}

#[test]
fn test_inclusive_no_duplicates() {
    let tree = parse_newick_str("((a,b,c),x);").unwrap();
    let groups = TaxonGroups::new([vec!["a"], vec!["b", "c"]]);

    let clades = all_monophyletic_nodes(&tree, &groups, &MatchConfig::default(), None);
    assert_eq!(clades.len(), 1);
}

// --- TESTS QUERY ---
#[test]
fn test_query_required() {
    let tree = parse_newick_str("(((HUMAN,mouse),x),((human2,mouse2),y));").unwrap();
    let groups = TaxonGroups::new([vec!["HUMAN", "human2"], vec!["mouse", "mouse2"]]);
    let config = MatchConfig::default().with_query_required(true);

    let clades = all_monophyletic_nodes(&tree, &groups, &config, Some("human"));
    assert_eq!(clades.len(), 1);
    assert_eq!(labels_under(&tree, clades[0]), ["HUMAN", "mouse"]);

    let without = all_monophyletic_nodes(&tree, &groups, &config, Some("rat"));
    assert!(without.is_empty());

    // Query is ignored unless required
    let ignored =
        all_monophyletic_nodes(&tree, &groups, &MatchConfig::default(), Some("rat"));
    assert_eq!(ignored.len(), 2);
}

#[test]
fn test_contains_query() {
    let tree = parse_newick_str("((Abc,d),e);").unwrap();
    let inner = tree.root().children()[0];
    assert!(contains_query(&tree, inner, Some("aBC")));
    assert!(!contains_query(&tree, inner, Some("e")));
    assert!(contains_query(&tree, inner, None));
}

// --- TESTS TAXON EXTRACTION ---
#[test]
fn test_matching_on_extracted_taxa() {
    let tree = parse_newick_str("(((HSAP_1,PTRO_1),GGOR_1),(MMUS_1,RNOR_1));").unwrap();
    let extractor = TaxonExtractor::new(r"([A-Z]{4})_\d+", 1).unwrap();
    let groups = TaxonGroups::new([vec!["HSAP", "PTRO"], vec!["GGOR"]]);
    let config = exclusive().with_extractor(extractor);

    let clade = monophyletic_node(&tree, &groups, &config, None).unwrap();
    assert_eq!(tree.size_of(clade), 3);
}

#[test]
fn test_unmatched_labels_are_foreign() {
    let tree = parse_newick_str("((HSAP_1,weird),MMUS_1);").unwrap();
    let extractor = TaxonExtractor::new(r"([A-Z]{4})_\d+", 1).unwrap();
    let groups = TaxonGroups::new([vec!["HSAP"], vec!["MMUS"]]);
    let config = exclusive().with_extractor(extractor);

    assert!(monophyletic_node(&tree, &groups, &config, None).is_none());
}
