//! Loading of tree text from files.
//!
//! Tree files are read line by line. Every line is trimmed and the lines are
//! concatenated without separator, so a tree may be wrapped over several
//! lines. Everything after the first `;` is discarded.

use crate::model::Tree;
use crate::newick::NewickParser;
use crate::newick::defs::TERMINATOR;
use crate::parser::parsing_error::ParsingError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Joins trimmed lines and cuts the result after the first terminator.
///
/// If no terminator is present, the joined text is returned as is and the
/// parser reports the missing terminator.
pub fn join_tree_lines<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut text = String::new();
    for line in lines {
        if push_line(&mut text, line) {
            break;
        }
    }
    text
}

/// Appends the trimmed line and returns `true` once the text is terminated.
fn push_line(text: &mut String, line: &str) -> bool {
    let offset = text.len();
    text.push_str(line.trim());
    match text[offset..].find(TERMINATOR) {
        Some(end) => {
            text.truncate(offset + end + TERMINATOR.len_utf8());
            true
        }
        None => false,
    }
}

/// Reads the tree text (up to and including the first `;`) from a file.
///
/// # Errors
/// Returns a [ParsingError] of kind `IoError`, naming the file, if the file
/// cannot be read.
pub fn load_tree_text<P: AsRef<Path>>(path: P) -> Result<String, ParsingError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ParsingError::from(e).with_file(path))?;

    let mut text = String::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| ParsingError::from(e).with_file(path))?;
        if push_line(&mut text, &line) {
            break;
        }
    }
    Ok(text)
}

/// Reads and parses the first tree of a file.
///
/// # Errors
/// Returns a [ParsingError] naming the file on I/O failure or malformed text.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tree, ParsingError> {
    let path = path.as_ref();
    let text = load_tree_text(path)?;
    NewickParser::new()
        .parse_str(&text)
        .map_err(|e| e.with_file(path))
}
