//! Newick format parser and writer for phylogenetic trees.
//!
//! This module provides [`NewickParser`] to parse a Newick string
//! into a [`Tree`] and [`to_newick`] to write it back.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses a single terminated string
//! * [`parse_file`] - parses the first tree of a file
//!
//! # Format
//! The supported Newick grammar:
//! * `tree ::= node ';'`
//! * `node ::= leaf | internal_node`
//! * `internal_node ::= '(' node { ',' node } ')' [label] [branch_length]`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Internal labels usually hold support values, e.g. `(A,B)95:0.3`
//! * Quoted labels, comments and extended annotations are not supported
//! * In files, a tree may span several lines; each line is trimmed and
//!   the lines are joined (see [crate::parser::source])

pub(crate) mod defs;
mod parser;
pub mod writer;

pub use self::parser::NewickParser;
pub use self::writer::{subtree_to_newick, to_newick, write_newick_file};

use crate::model::Tree;
use crate::parser::ParsingError;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses the first tree of a file.
///
/// Lines are trimmed and concatenated, and the text is cut after the
/// first `;` before parsing.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///
/// # Returns
/// * [`Tree`] - The parsed tree
/// * [`ParsingError`] - If file reading fails or Newick format is invalid,
///   naming the file
///
/// # Example
/// ```no_run
/// use cladesort::newick::parse_file;
///
/// let tree = parse_file("OG0001.tre")?;
/// println!("Parsed tree with {} leaves", tree.size());
/// # Ok::<(), cladesort::parser::ParsingError>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tree, ParsingError> {
    crate::parser::source::parse_file(path)
}

/// Parses a single Newick string to obtain a [`Tree`].
///
/// # Arguments
/// * `newick` - The Newick format string to parse, terminated by `;`
///
/// # Returns
/// * [`Tree`] - Tree parsed from the string
/// * [`ParsingError`] - If the string is not valid Newick format
///
/// # Example
/// ```
/// use cladesort::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));").unwrap();
/// assert_eq!(tree.size(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    NewickParser::new().parse_str(newick.as_ref())
}
