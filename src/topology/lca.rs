//! Root-to-node paths, lowest common ancestors and node distances.
//!
//! All functions take arena indices of nodes of one tree. The LCA is
//! computed from a grid of root paths (one row per node), scanning depth
//! columns while all rows agree.

use crate::model::{Distance, NodeId, NodeIndex, Path, Tree};

/// Returns the path of ids from the root down to `node`, root first.
///
/// # Example
/// ```
/// use cladesort::parse_newick_str;
/// use cladesort::topology::lca::path_from_root;
///
/// let tree = parse_newick_str("((a,b),c);").unwrap();
/// let b = tree.find("b").unwrap();
/// assert_eq!(path_from_root(&tree, b).ids(), &[0, 1, 3]);
/// ```
pub fn path_from_root(tree: &Tree, node: NodeIndex) -> Path {
    index_path(tree, node)
        .into_iter()
        .map(|i| tree[i].id())
        .collect::<Vec<NodeId>>()
        .into()
}

/// Returns the path of ids from `ancestor` down to `node`,
/// or `None` if `ancestor` is not an ancestor of (or equal to) `node`.
pub fn path_from(tree: &Tree, ancestor: NodeIndex, node: NodeIndex) -> Option<Path> {
    let path = index_path(tree, node);
    let start = path.iter().position(|&i| i == ancestor)?;
    Some(Path::new(path[start..].iter().map(|&i| tree[i].id()).collect()))
}

/// Returns the id of the lowest common ancestor of the given nodes.
///
/// `None` if `nodes` is empty or the nodes share no ancestor (which happens
/// only for nodes detached from the tree).
pub fn lca(tree: &Tree, nodes: &[NodeIndex]) -> Option<NodeId> {
    lca_node(tree, nodes).map(|i| tree[i].id())
}

/// Returns the arena index of the lowest common ancestor of the given nodes.
///
/// See [lca].
pub fn lca_node(tree: &Tree, nodes: &[NodeIndex]) -> Option<NodeIndex> {
    let grid: Vec<Vec<NodeIndex>> = nodes.iter().map(|&n| index_path(tree, n)).collect();
    let max_len = grid.iter().map(Vec::len).max()?;

    let mut lca = None;
    for depth in 0..max_len {
        // A row that ran out can no longer match
        let Some(first) = grid[0].get(depth) else {
            break;
        };
        if grid.iter().all(|row| row.get(depth) == Some(first)) {
            lca = Some(*first);
        } else {
            break;
        }
    }
    lca
}

/// Returns the distance between two nodes, via their lowest common ancestor.
///
/// `None` if the nodes share no ancestor.
///
/// # Example
/// ```
/// use cladesort::parse_newick_str;
/// use cladesort::topology::lca::distance;
///
/// let tree = parse_newick_str("((a:1,b:2):3,c:4);").unwrap();
/// let a = tree.find("a").unwrap();
/// let c = tree.find("c").unwrap();
/// let d = distance(&tree, a, c).unwrap();
/// assert_eq!(d.depth, 3);
/// assert_eq!(d.length, 8.0);
/// ```
pub fn distance(tree: &Tree, a: NodeIndex, b: NodeIndex) -> Option<Distance> {
    let lca = lca_node(tree, &[a, b])?;
    let (depth_a, length_a) = climb_to(tree, a, lca);
    let (depth_b, length_b) = climb_to(tree, b, lca);
    Some(Distance::new(depth_a + depth_b, length_a + length_b))
}

/// Returns the leaf farthest from `node`, comparing first edge count, then
/// branch length. Ties keep the first leaf in pre-order.
pub fn farthest_leaf(tree: &Tree, node: NodeIndex) -> Option<NodeIndex> {
    let mut farthest: Option<(NodeIndex, Distance)> = None;
    for leaf in tree.leaves() {
        if leaf == node {
            continue;
        }
        let Some(d) = distance(tree, node, leaf) else {
            continue;
        };
        let is_farther = match &farthest {
            None => true,
            Some((_, best)) => {
                d.depth > best.depth || (d.depth == best.depth && d.length > best.length)
            }
        };
        if is_farther {
            farthest = Some((leaf, d));
        }
    }
    farthest.map(|(leaf, _)| leaf)
}

/// Returns the leaf nearest to `node`.
///
/// Candidates are searched in the clade of the parent first, then of each
/// further ancestor, until one is found. Within a clade the nearest leaf has
/// the fewest edges, then the shortest branch length. Leaves whose label
/// contains any of the `skip` strings are ignored.
///
/// # Example
/// ```
/// use cladesort::parse_newick_str;
/// use cladesort::topology::lca::nearest_leaf;
///
/// let tree = parse_newick_str("(((a:1,b:1):1,x_c:1):1,d:1);").unwrap();
/// let a = tree.find("a").unwrap();
/// let b = nearest_leaf::<&str>(&tree, a, &[]).unwrap();
/// assert_eq!(tree[b].label(), "b");
///
/// let skipped = nearest_leaf(&tree, a, &["b", "x_"]).unwrap();
/// assert_eq!(tree[skipped].label(), "d");
/// ```
pub fn nearest_leaf<S: AsRef<str>>(tree: &Tree, node: NodeIndex, skip: &[S]) -> Option<NodeIndex> {
    for ancestor in tree.ancestors(node) {
        let mut nearest: Option<(NodeIndex, Distance)> = None;
        for leaf in tree.leaves_of(ancestor) {
            if leaf == node {
                continue;
            }
            let label = tree[leaf].label();
            if skip.iter().any(|s| label.contains(s.as_ref())) {
                continue;
            }
            let Some(d) = distance(tree, node, leaf) else {
                continue;
            };
            let is_nearer = match &nearest {
                None => true,
                Some((_, best)) => {
                    d.depth < best.depth || (d.depth == best.depth && d.length < best.length)
                }
            };
            if is_nearer {
                nearest = Some((leaf, d));
            }
        }

        if let Some((leaf, _)) = nearest {
            return Some(leaf);
        }
    }
    None
}

/// Returns arena indices from the topmost ancestor of `node` down to `node`.
fn index_path(tree: &Tree, node: NodeIndex) -> Vec<NodeIndex> {
    let mut path: Vec<NodeIndex> = std::iter::once(node).chain(tree.ancestors(node)).collect();
    path.reverse();
    path
}

/// Returns edge count and summed branch length from `node` up to `ancestor`.
fn climb_to(tree: &Tree, node: NodeIndex, ancestor: NodeIndex) -> (usize, f64) {
    let mut depth = 0;
    let mut length = 0.0;
    let mut current = node;
    while current != ancestor {
        depth += 1;
        length += tree[current].length();
        match tree[current].parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    (depth, length)
}
