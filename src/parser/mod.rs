//! Parsing errors and loading of tree text from files.
pub mod parsing_error;
pub mod source;

pub use parsing_error::{ParsingError, ParsingErrorType};
pub use source::{join_tree_lines, load_tree_text, parse_file};
