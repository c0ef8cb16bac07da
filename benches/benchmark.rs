use cladesort::cluster::ClusterMerger;
use cladesort::config::MatchConfig;
use cladesort::newick::parse_str;
use cladesort::topology::clade::{TaxonGroups, all_monophyletic_nodes};
use cladesort::topology::reroot::reroot;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const PARSING_SIZES: &[(&str, usize)] = &[("caterpillar-n128", 128), ("caterpillar-n1024", 1024)];

const CLUSTERING_SIZES: &[(&str, usize)] = &[("chain-200", 200), ("chain-800", 800)];

/// Returns a caterpillar tree `(((t0:1,t1:2):1,t2:3):1,...);` with `n` leaves.
fn caterpillar(n: usize) -> String {
    let mut newick = String::from("t0:1");
    for i in 1..n {
        newick = format!("({newick},t{i}:{}):1", i + 1);
    }
    newick.push(';');
    newick
}

fn newick_parsing(c: &mut Criterion) {
    for &(name, n) in PARSING_SIZES {
        let newick = caterpillar(n);
        c.bench_function(name, |b| {
            b.iter(|| parse_str(black_box(&newick)).unwrap());
        });
    }
}

fn topology(c: &mut Criterion) {
    let tree = parse_str(caterpillar(256)).unwrap();
    let groups = TaxonGroups::new((0..32).map(|g| [format!("t{}", 2 * g), format!("t{}", 2 * g + 1)]));
    let config = MatchConfig::default();

    c.bench_function("clades-n256", |b| {
        b.iter(|| all_monophyletic_nodes(black_box(&tree), &groups, &config, None));
    });

    let leaves = tree.leaves();
    c.bench_function("reroot-n256", |b| {
        b.iter(|| reroot(black_box(&tree), leaves[0]));
    });
}

fn clustering(c: &mut Criterion) {
    for &(name, n) in CLUSTERING_SIZES {
        c.bench_function(name, |b| {
            b.iter(|| {
                // Each tree shares one taxon with the next, merging into one cluster
                let mut merger = ClusterMerger::default();
                for i in 0..n {
                    merger.add_tree(format!("tree{i}"), [format!("x{i}"), format!("x{}", i + 1)]);
                }
                merger.run()
            });
        });
    }
}

criterion_group!(regression, newick_parsing, topology);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = clustering
}
criterion_main!(regression, reporting);
