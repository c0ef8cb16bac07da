use clap::{Parser, Subcommand};
use cladesort::batch::{self, SortReport};
use cladesort::config::SortConfig;
use cladesort::error::{BatchError, ConfigError, TreeError};
use cladesort::model::Tree;
use cladesort::newick::{self, write_newick_file};
use cladesort::parser::ParsingError;
use cladesort::topology::clade::TaxonGroups;
use cladesort::topology::{lca, prune, reroot, transform};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    name = "cladesort",
    about = "Sort, cluster and restructure phylogenetic trees in Newick notation",
    version
)]
struct Cli {
    /// Properties file; defaults to phylosort.config in the working directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the distinct leaf taxa of a tree file or of all trees in a directory.
    Taxa {
        /// A tree file, or a directory of tree files
        path: PathBuf,
    },

    /// Sort tree files by monophyly of taxon groups.
    Sort {
        input: PathBuf,
        output: PathBuf,
        /// One group per line, taxa separated by ", \t:"
        groups: PathBuf,
    },

    /// Cluster tree files sharing taxa into clusterNN folders.
    Cluster {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = cladesort::cluster::DEFAULT_MIN_OVERLAP)]
        min_overlap: usize,
    },

    /// Print the nearest leaf of a node and the support of their LCA.
    Sister {
        tree: PathBuf,
        node: String,
        /// Skip leaves whose label contains any of these strings
        #[arg(long, value_delimiter = ',')]
        skip: Vec<String>,
    },

    /// Remove the nodes named in a file (one label prefix per line).
    Reduce {
        tree: PathBuf,
        names: PathBuf,
    },

    /// Reroot a tree at the node with the given label prefix.
    Reroot {
        tree: PathBuf,
        node: String,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the result as indented text
        #[arg(long)]
        ascii: bool,
    },

    /// Clear support labels below a minimum.
    Clean {
        input: PathBuf,
        output: PathBuf,
        min: f64,
    },

    /// Replace branch lengths by log10(scale * length).
    Transform {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No node labeled '{0}'")]
    NodeNotFound(String),

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(Cli::parse()) {
        tracing::error!(%error, "Failed");
        eprintln!("{error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = SortConfig::discover(cli.config.as_deref())?;
    let extractor = config.matching().extractor();

    match cli.command {
        Commands::Taxa { path } => {
            let taxa = if path.is_dir() {
                batch::load_taxa(&path, extractor)?
            } else {
                batch::tree_taxa(&path, extractor)?
            };
            for taxon in taxa {
                println!("{taxon}");
            }
        }
        Commands::Sort {
            input,
            output,
            groups,
        } => {
            let groups = TaxonGroups::new(batch::load_groups(&groups)?);
            let SortReport {
                processed,
                matched,
                failed,
            } = batch::sort_dir(&input, &output, &groups, &config)?;
            println!("{}\t{processed}\t{matched}\t{failed}", input.display());
        }
        Commands::Cluster {
            input,
            output,
            min_overlap,
        } => {
            let outcome = batch::cluster_dir(&input, &output, min_overlap, extractor)?;
            let trees: usize = outcome.clusters.iter().map(|c| c.trees().len()).sum();
            println!("{}\t{trees}\t{}", input.display(), outcome.clusters.len());
        }
        Commands::Sister { tree, node, skip } => {
            let tree = newick::parse_file(&tree)?;
            let index = find(&tree, &node)?;
            match lca::nearest_leaf(&tree, index, &skip) {
                Some(sister) => {
                    let support = lca::lca_node(&tree, &[index, sister])
                        .map(|a| tree[a].label())
                        .filter(|label| !label.is_empty())
                        .unwrap_or("0.0");
                    println!("{node}\t{}\t{support}", tree[sister].label());
                }
                None => println!("{node}\t\t"),
            }
        }
        Commands::Reduce { tree, names } => {
            let mut tree = newick::parse_file(&tree)?;
            let names = batch::load_names(&names)?;
            println!("Before:\n{tree}");
            prune::remove_nodes(&mut tree, &names)?;
            tree.renumber_preorder();
            println!("After:\n{tree}");
        }
        Commands::Reroot {
            tree,
            node,
            output,
            ascii,
        } => {
            let tree = newick::parse_file(&tree)?;
            let rerooted = reroot::reroot(&tree, find(&tree, &node)?);
            match output {
                Some(path) => save(&rerooted, &path)?,
                None if ascii => print!("{}", rerooted.render_ascii()),
                None => println!("{rerooted}"),
            }
        }
        Commands::Clean { input, output, min } => {
            let mut tree = newick::parse_file(&input)?;
            transform::clean_support(&mut tree, min);
            save(&tree, &output)?;
        }
        Commands::Transform {
            input,
            output,
            scale,
        } => {
            let tree = newick::parse_file(&input)?;
            save(&transform::log10_lengths(&tree, scale), &output)?;
        }
    }
    Ok(())
}

fn find(tree: &Tree, name: &str) -> Result<usize, CliError> {
    tree.find(name)
        .ok_or_else(|| CliError::NodeNotFound(name.to_string()))
}

fn save(tree: &Tree, path: &Path) -> Result<(), CliError> {
    let write_error = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    write_newick_file(file, std::slice::from_ref(tree)).map_err(write_error)
}
