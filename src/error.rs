//! Error types for tree mutation, configuration and batch processing.
//!
//! Parse errors live in [crate::parser::ParsingError]. Lookup misses
//! (label not found, undefined LCA, no matching clade) are not errors and
//! are reported as `None` or empty collections.

use crate::model::NodeIndex;
use crate::parser::ParsingError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from structural tree mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// The root itself was asked to be removed.
    #[error("Cannot remove the root of a tree")]
    RootRemoval,

    /// Removal would leave the tree without nodes.
    #[error("Removal would leave an empty tree")]
    EmptyTree,

    /// A structural invariant did not hold during restructuring.
    #[error("Tree invariant violated: {0}")]
    Invariant(String),

    /// Node index is not part of the tree.
    #[error("Unknown node {0}")]
    UnknownNode(NodeIndex),
}

/// Errors from building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value of a key cannot be interpreted.
    #[error("Invalid value '{value}' for key '{key}'")]
    InvalidValue { key: String, value: String },

    /// Pattern does not compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration file cannot be read.
    #[error("Cannot read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from batch processing of tree directories.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Directory or file operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        BatchError::Io {
            path: path.into(),
            source,
        }
    }
}
