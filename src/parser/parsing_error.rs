//! Error types for the Newick parser.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while reading and parsing tree text.

use std::error::Error;
use std::fmt;
use std::path::Path;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur during Newick parsing.
#[derive(PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    IoError(String),
    EmptyInput,
    MissingTerminator,
    UnbalancedBrackets,
    TextBeforeChildren,
    InvalidBranchLength(String),
    MalformedNode(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (byte position, surrounding text
/// and, when loaded from disk, the file name).
#[derive(Debug)]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
    file: Option<String>,
}

impl ParsingError {
    /// Create a ParsingError from an error type and the text being parsed.
    ///
    /// # Arguments
    /// * `kind` - What went wrong
    /// * `text` - Full tree text
    /// * `position` - Byte offset into `text` where the problem was found
    pub fn from_text(kind: ParsingErrorType, text: &str, position: usize) -> Self {
        Self {
            kind,
            position,
            context: context_at(text, position, DEFAULT_CONTEXT_LENGTH),
            file: None,
        }
    }

    /// Convenience constructor for EmptyInput
    pub fn empty_input() -> Self {
        Self::without_context(ParsingErrorType::EmptyInput)
    }

    /// Convenience constructor for MissingTerminator
    pub fn missing_terminator(text: &str) -> Self {
        Self::from_text(ParsingErrorType::MissingTerminator, text, text.len())
    }

    /// Convenience constructor for UnbalancedBrackets
    pub fn unbalanced_brackets(text: &str, position: usize) -> Self {
        Self::from_text(ParsingErrorType::UnbalancedBrackets, text, position)
    }

    /// Convenience constructor for TextBeforeChildren
    pub fn text_before_children(text: &str, position: usize) -> Self {
        Self::from_text(ParsingErrorType::TextBeforeChildren, text, position)
    }

    /// Convenience constructor for InvalidBranchLength
    pub fn invalid_branch_length(text: &str, position: usize, value: &str) -> Self {
        Self::from_text(
            ParsingErrorType::InvalidBranchLength(value.to_string()),
            text,
            position,
        )
    }

    /// Convenience constructor for MalformedNode
    pub fn malformed_node(text: &str, position: usize, msg: String) -> Self {
        Self::from_text(ParsingErrorType::MalformedNode(msg), text, position)
    }

    /// Create a ParsingError without parser context
    pub fn without_context(kind: ParsingErrorType) -> Self {
        Self {
            kind,
            position: 0,
            context: String::new(),
            file: None,
        }
    }

    /// Attaches the name of the file the tree text was read from.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().display().to_string());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the text following the error position
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Get the file the tree text was read from, if known
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{file}: ")?;
        }

        // Main error message
        match &self.kind {
            ParsingErrorType::IoError(msg) => return write!(f, "IO error - {msg}"),
            ParsingErrorType::EmptyInput => return write!(f, "Empty tree text"),
            ParsingErrorType::MissingTerminator => write!(f, "Tree text does not end with ';'")?,
            ParsingErrorType::UnbalancedBrackets => write!(f, "Unbalanced brackets")?,
            ParsingErrorType::TextBeforeChildren => {
                write!(f, "Unexpected text before children list")?
            }
            ParsingErrorType::InvalidBranchLength(value) => {
                write!(f, "Invalid branch length '{value}'")?
            }
            ParsingErrorType::MalformedNode(msg) => write!(f, "Malformed node - {msg}")?,
        }

        // Additional position information
        write!(f, " at position {}", self.position)?;

        // Additional context if available
        if !self.context.is_empty() {
            write!(f, "\n  Context (next {} bytes): {}", self.context.len(), self.context)?;
        }

        Ok(())
    }
}

impl Error for ParsingError {}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        Self::without_context(ParsingErrorType::IoError(err.to_string()))
    }
}

/// Returns up to `length` bytes of `text` starting at `position`,
/// shrunk to char boundaries.
fn context_at(text: &str, position: usize, length: usize) -> String {
    let mut start = position.min(text.len());
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (start + length).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[start..end].to_string()
}
