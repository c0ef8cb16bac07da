use cladesort::model::{TaxonExtractor, TaxonFallback, Tree, TreeNode};
use cladesort::parse_newick_str;
use regex::Regex;

#[test]
fn test_building_tree() {
    let mut tree = Tree::new(TreeNode::default());
    let root = tree.root_index();
    let internal = tree.add_node(TreeNode::new("", 1.5));
    let a = tree.add_node(TreeNode::new("A", 1.0));
    let b = tree.add_node(TreeNode::new("B", 1.0));
    let c = tree.add_node(TreeNode::new("C", 0.5));
    tree.add_child(internal, a);
    tree.add_child(internal, b);
    tree.add_child(root, c);
    tree.add_child(root, internal);
    tree.renumber_preorder();

    // Counts
    assert_eq!(tree.size(), 3);
    assert_eq!(tree.num_nodes(), 5);
    assert_eq!(tree.arena_len(), 5);
    assert!(tree.is_valid());

    // Root
    assert!(tree.is_root(root));
    assert!(!tree.root().has_parent());
    assert_eq!(tree.root().children(), &[c, internal]);

    // Leaf
    assert!(tree[a].is_leaf());
    assert_eq!(tree[a].parent(), Some(internal));
    assert_eq!(tree[a].level(), 2);

    // Internal
    assert!(!tree[internal].is_leaf());
    assert_eq!(tree[internal].length(), 1.5);
    assert_eq!(tree[internal].id(), 2);
}

#[test]
fn test_add_child_twice_is_noop() {
    let mut tree = Tree::new(TreeNode::default());
    let root = tree.root_index();
    let a = tree.add_node(TreeNode::new("A", 0.0));
    tree.add_child(root, a);
    tree.add_child(root, a);
    assert_eq!(tree.root().num_children(), 1);
}

#[test]
fn test_add_child_moves_between_parents() {
    let mut tree = parse_newick_str("((A,B)x,(C)y);").unwrap();
    let a = tree.find("A").unwrap();
    let x = tree.find("x").unwrap();
    let y = tree.find("y").unwrap();

    tree.add_child(y, a);

    assert_eq!(tree[a].parent(), Some(y));
    assert!(!tree[x].has_child(a));
    assert_eq!(tree.size_of(x), 1);
    assert_eq!(tree.size_of(y), 2);
}

#[test]
#[should_panic]
fn test_node_cannot_be_own_child() {
    let mut tree = Tree::new(TreeNode::default());
    let root = tree.root_index();
    tree.add_child(root, root);
}

#[test]
#[should_panic]
fn test_get_node_out_of_bounds() {
    let tree = parse_newick_str("(A,B);").unwrap();
    let _ = &tree[55];
}

#[test]
fn test_leaves_and_size_agree() {
    let tree = parse_newick_str("(((a,b),c),((d,e),(f,(g,h))));").unwrap();
    assert_eq!(tree.size(), tree.leaves().len());

    let all = tree.leaves();
    for node in tree.pre_order_iter() {
        let under = tree.leaves_of(node);
        assert_eq!(under.len(), tree.size_of(node));
        assert!(under.iter().all(|leaf| all.contains(leaf)));
    }
}

#[test]
fn test_tree_without_root_is_empty() {
    let mut tree = Tree::with_capacity(2);
    assert!(!tree.is_root_set());
    assert_eq!(tree.size(), 0);
    assert!(tree.leaves().is_empty());

    tree.add_node(TreeNode::new("a", 1.0));
    assert_eq!(tree.size(), 0);
    assert_eq!(tree.num_nodes(), 0);
}

#[test]
fn test_traversal_orders() {
    let tree = parse_newick_str("((A,B)x,C)r;").unwrap();
    let labels = |order: Vec<usize>| -> Vec<String> {
        order.into_iter().map(|i| tree[i].label().to_string()).collect()
    };

    assert_eq!(labels(tree.pre_order_iter().collect()), ["r", "x", "A", "B", "C"]);
    assert_eq!(labels(tree.post_order_iter().collect()), ["A", "B", "x", "C", "r"]);

    let x = tree.find("x").unwrap();
    assert_eq!(labels(tree.post_order_from(x).collect()), ["A", "B", "x"]);
}

#[test]
fn test_ancestors() {
    let tree = parse_newick_str("((A,B)x,C)r;").unwrap();
    let a = tree.find("A").unwrap();
    let x = tree.find("x").unwrap();
    let c = tree.find("C").unwrap();

    let ancestors: Vec<usize> = tree.ancestors(a).collect();
    assert_eq!(ancestors, vec![x, tree.root_index()]);
    assert!(tree.is_ancestor(x, a));
    assert!(tree.is_ancestor(a, a));
    assert!(!tree.is_ancestor(x, c));
}

#[test]
fn test_find_by_prefix_and_pattern() {
    let tree = parse_newick_str("((Homo_sapiens,Homo_erectus),Pan_paniscus);").unwrap();

    let homo = tree.find("Homo").unwrap();
    assert_eq!(tree[homo].label(), "Homo_sapiens");
    assert!(tree.find("Gorilla").is_none());

    let pattern = Regex::new(r"Homo_e\w+").unwrap();
    let erectus = tree.find_matching(&pattern).unwrap();
    assert_eq!(tree[erectus].label(), "Homo_erectus");

    // Only whole labels match
    let partial = Regex::new("Pan").unwrap();
    assert!(tree.find_matching(&partial).is_none());

    let id = tree[erectus].id();
    assert_eq!(tree.find_by_id(id), Some(erectus));
}

#[test]
fn test_total_length_ignores_root() {
    let tree = parse_newick_str("((A:1,B:2):3,C:4):100;").unwrap();
    assert_eq!(tree.total_length(), 10.0);
}

#[test]
fn test_copy_subtree_excluding_child() {
    let tree = parse_newick_str("((A:1,B:2)x:3,(C:4,D:5)y:6);").unwrap();
    let y = tree.find("y").unwrap();

    let copy = tree.copy_subtree(tree.root_index(), Some(y));
    assert_eq!(copy.to_newick(), "((A:1,B:2)x:3);");
    assert_eq!(copy.num_nodes(), copy.arena_len());

    // Source is untouched
    assert_eq!(tree.size(), 4);
}

#[test]
fn test_detach_and_compact() {
    let mut tree = parse_newick_str("((A,B)x,C);").unwrap();
    let b = tree.find("B").unwrap();
    tree.detach(b);

    assert_eq!(tree.size(), 2);
    assert_eq!(tree.arena_len(), 5);
    assert_eq!(tree.num_nodes(), 4);

    tree.compact();
    assert_eq!(tree.arena_len(), 4);
    assert_eq!(tree.root_index(), 0);
    assert_eq!(tree.to_newick(), "((A)x,C);");
}

#[test]
fn test_renumber_after_restructure() {
    let mut tree = parse_newick_str("((A,B)x,C);").unwrap();
    let x = tree.find("x").unwrap();
    let c = tree.find("C").unwrap();
    tree.add_child(x, c);
    tree.renumber_preorder();

    assert!(tree.is_valid());
    assert_eq!(tree[c].level(), 2);
    assert_eq!(tree[c].id(), 4);
}

#[test]
fn test_render_ascii() {
    let tree = parse_newick_str("((A:0.1,B:0.2)90:0.3,C:0.4);").unwrap();
    let rendered = tree.render_ascii();
    assert_eq!(rendered.lines().count(), 5);
    assert!(rendered.contains("90 (length: 0.300)"));
    assert!(rendered.contains("\"C\" (length: 0.400)"));
}

// ============= Taxon Extraction Tests =============

#[test]
fn test_default_extractor_uses_whole_label() {
    let extractor = TaxonExtractor::default();
    assert_eq!(extractor.extract("Homo_sapiens"), Some("Homo_sapiens"));
    assert_eq!(extractor.extract(""), None);
}

#[test]
fn test_pattern_extractor() {
    let extractor = TaxonExtractor::new(r"([A-Z]{4})_\d+", 1).unwrap();
    assert_eq!(extractor.extract("HSAP_0001"), Some("HSAP"));
    assert_eq!(extractor.extract("xHSAP_0001"), None);
    assert_eq!(extractor.extract("HSAP_0001x"), None);

    let fallback = extractor.with_fallback(TaxonFallback::Label);
    assert_eq!(fallback.extract("unmatched"), Some("unmatched"));
}

#[test]
fn test_invalid_pattern() {
    assert!(TaxonExtractor::new("(unclosed", 1).is_err());
}

#[test]
fn test_taxa_of_leaves_only() {
    let tree = parse_newick_str("((HSAP_1,HSAP_2)INTE_9,(MMUS_1,RNOR_1));").unwrap();
    let extractor = TaxonExtractor::new(r"(\w{4})_\d+", 1).unwrap();

    let taxa: Vec<String> = extractor.taxa(&tree).into_iter().collect();
    assert_eq!(taxa, ["HSAP", "MMUS", "RNOR"]);

    let internal = tree.find("INTE").unwrap();
    assert_eq!(extractor.taxon_of(&tree, internal), None);
    assert_eq!(extractor.taxa_under(&tree, internal).len(), 1);
}
