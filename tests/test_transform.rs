use cladesort::model::TaxonExtractor;
use cladesort::parse_newick_str;
use cladesort::topology::transform::{
    average_copies, clean_support, find_outgroup, log10_lengths, support,
};
use std::collections::HashSet;

#[test]
fn test_support_values() {
    let tree = parse_newick_str("(((a,b)95,c)x,d);").unwrap();
    let inner = tree.find("95").unwrap();
    assert_eq!(support(&tree, inner), Some(95.0));

    let x = tree.find("x").unwrap();
    assert_eq!(support(&tree, x), None);
    assert_eq!(support(&tree, tree.root_index()), None);
}

#[test]
fn test_clean_support() {
    let mut tree = parse_newick_str("((((a,b)49.9,c)50,d)bad,e);").unwrap();
    clean_support(&mut tree, 50.0);
    assert_eq!(tree.to_newick(), "((((a,b),c)50,d),e);");
}

#[test]
fn test_clean_support_keeps_leaf_labels() {
    let mut tree = parse_newick_str("((1,2)10,3);").unwrap();
    clean_support(&mut tree, 50.0);
    assert_eq!(tree.to_newick(), "((1,2),3);");
}

#[test]
fn test_log10_lengths() {
    let tree = parse_newick_str("((a:10,b:100):1000,c:0);").unwrap();

    let transformed = log10_lengths(&tree, 1.0);
    assert_eq!(transformed.to_newick(), "(c,(a:1,b:2):3);");

    let scaled = log10_lengths(&tree, 10.0);
    let a = scaled.find("a").unwrap();
    assert_eq!(scaled[a].length(), 2.0);

    // Input is untouched
    assert_eq!(tree.total_length(), 1110.0);
}

#[test]
fn test_average_copies() {
    let extractor = TaxonExtractor::default();

    let single_copy = parse_newick_str("((a,b),(c,d));").unwrap();
    assert_eq!(average_copies(&single_copy, &extractor), 1.0);

    let duplicated = parse_newick_str("((a,a),(a,b));").unwrap();
    assert_eq!(average_copies(&duplicated, &extractor), 2.0);
}

#[test]
fn test_find_outgroup() {
    let tree = parse_newick_str("((a,b),(c,d));").unwrap();
    let extractor = TaxonExtractor::default();

    let ingroup: HashSet<String> = ["a", "b"].into_iter().map(String::from).collect();
    let outgroup = find_outgroup(&tree, &extractor, &ingroup).unwrap();
    assert_eq!(tree[outgroup].label(), "c");

    let everything: HashSet<String> =
        ["a", "b", "c", "d"].into_iter().map(String::from).collect();
    assert!(find_outgroup(&tree, &extractor, &everything).is_none());
}
