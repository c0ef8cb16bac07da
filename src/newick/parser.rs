//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which turns a single
//! terminated Newick string into a [Tree].

use crate::model::{NodeIndex, Tree, TreeNode};
use crate::model::node::DEFAULT_BRANCH_LENGTH;
use crate::newick::defs::{
    DEFAULT_NUM_LEAVES_GUESS, GROUP_CLOSE, GROUP_OPEN, LENGTH_SEPARATOR, SIBLING_SEPARATOR,
    TERMINATOR,
};
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser (configuration) for a single Newick tree of arbitrary degree.
///
/// The parser descends recursively: a substring without `(` is a leaf,
/// otherwise the first `(` and the last `)` bound the children list and any
/// text after the last `)` is the node's own `label[:length]`. Children are
/// split on commas at nesting depth zero.
///
/// Nodes are numbered while parsing with
/// [Tree::assign_during_parse](crate::model::Tree::assign_during_parse).
///
/// # Configuration
/// * [`with_num_leaves(num_leaves)`](Self::with_num_leaves)
///     - Expected number of leaves, used to pre-allocate the arena.
///
/// # Example
/// ```
/// use cladesort::newick::NewickParser;
///
/// let tree = NewickParser::new()
///     .parse_str("((A_meleagrides:1.0,A_vulturinum:1.0)95:0.5,N_meleagris:1.5);")
///     .unwrap();
/// assert_eq!(tree.size(), 3);
/// assert_eq!(tree.num_nodes(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    num_leaves: usize,
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    pub fn new() -> Self {
        Self {
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
        }
    }

    /// Sets the expected number of leaves in the parsed tree.
    ///
    /// This allows pre-allocation of the arena.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self
    }
}

// ============================================================================
// Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses one Newick string terminated by `;`.
    ///
    /// Trailing whitespace after the terminator is ignored.
    ///
    /// # Errors
    /// Returns a [ParsingError] if
    /// * the text is empty,
    /// * the terminator is missing,
    /// * brackets are unbalanced,
    /// * a children list is preceded by other text,
    /// * a branch length is not a number, or
    /// * a leaf contains structural characters.
    pub fn parse_str(&self, newick: &str) -> Result<Tree, ParsingError> {
        let text = newick.trim_end();
        if text.trim_start().is_empty() {
            return Err(ParsingError::empty_input());
        }

        let Some(body) = text.strip_suffix(TERMINATOR) else {
            return Err(ParsingError::missing_terminator(text));
        };

        check_brackets(text, body.len())?;

        let mut run = ParseRun {
            text,
            tree: Tree::with_capacity(self.num_leaves * 2),
        };
        let root = run.parse_node(0, body.len(), None)?;
        run.tree.set_root(root);
        Ok(run.tree)
    }
}

// ============================================================================
// Helper (private)
// ============================================================================
/// Verifies that brackets in `text[..end]` are balanced and properly nested.
fn check_brackets(text: &str, end: usize) -> Result<(), ParsingError> {
    let mut open_positions = Vec::new();
    for (position, c) in text[..end].char_indices() {
        match c {
            GROUP_OPEN => open_positions.push(position),
            GROUP_CLOSE => {
                if open_positions.pop().is_none() {
                    return Err(ParsingError::unbalanced_brackets(text, position));
                }
            }
            _ => {}
        }
    }

    match open_positions.pop() {
        Some(unclosed) => Err(ParsingError::unbalanced_brackets(text, unclosed)),
        None => Ok(()),
    }
}

/// State of one parse: the full text (for absolute error positions)
/// and the tree under construction.
struct ParseRun<'a> {
    text: &'a str,
    tree: Tree,
}

impl<'a> ParseRun<'a> {
    /// Parses `text[start..end]` as one node below `parent` and returns its index.
    fn parse_node(
        &mut self,
        start: usize,
        end: usize,
        parent: Option<NodeIndex>,
    ) -> Result<NodeIndex, ParsingError> {
        let (start, end) = self.trim(start, end);
        let segment = &self.text[start..end];

        let Some(open) = segment.find(GROUP_OPEN).map(|p| start + p) else {
            return self.parse_leaf(start, end, parent);
        };

        // Balanced brackets guarantee a closing bracket after `open`
        let close = segment
            .rfind(GROUP_CLOSE)
            .map(|p| start + p)
            .filter(|&p| p > open)
            .ok_or_else(|| ParsingError::unbalanced_brackets(self.text, open))?;

        if open != start {
            return Err(ParsingError::text_before_children(self.text, start));
        }

        let (label, length) = self.parse_descriptor(close + 1, end)?;
        let index = self.attach(TreeNode::new(label, length), parent);

        for (child_start, child_end) in self.split_children(open + 1, close) {
            self.parse_node(child_start, child_end, Some(index))?;
        }

        Ok(index)
    }

    fn parse_leaf(
        &mut self,
        start: usize,
        end: usize,
        parent: Option<NodeIndex>,
    ) -> Result<NodeIndex, ParsingError> {
        let segment = &self.text[start..end];
        if let Some(p) = segment.find([GROUP_CLOSE, SIBLING_SEPARATOR]) {
            return Err(ParsingError::malformed_node(
                self.text,
                start + p,
                format!("unexpected '{}' in leaf", &segment[p..p + 1]),
            ));
        }

        let (label, length) = self.parse_descriptor(start, end)?;
        Ok(self.attach(TreeNode::new(label, length), parent))
    }

    /// Parses `label[:length]` in `text[start..end]`, splitting on the last colon.
    fn parse_descriptor(&self, start: usize, end: usize) -> Result<(&'a str, f64), ParsingError> {
        let text = self.text;
        let (start, end) = self.trim(start, end);
        let descriptor = &text[start..end];

        if let Some(p) = descriptor.find([GROUP_OPEN, GROUP_CLOSE, SIBLING_SEPARATOR]) {
            return Err(ParsingError::malformed_node(
                text,
                start + p,
                format!("unexpected '{}' after children list", &descriptor[p..p + 1]),
            ));
        }

        match descriptor.rfind(LENGTH_SEPARATOR) {
            None => Ok((descriptor, DEFAULT_BRANCH_LENGTH)),
            Some(colon) => {
                let value = descriptor[colon + 1..].trim();
                let length = value.parse::<f64>().map_err(|_| {
                    ParsingError::invalid_branch_length(text, start + colon + 1, value)
                })?;
                Ok((descriptor[..colon].trim_end(), length))
            }
        }
    }

    /// Returns the segments of the children list `text[start..end]`
    /// separated by commas at depth zero.
    fn split_children(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
        let mut segments = Vec::new();
        let mut depth = 0usize;
        let mut segment_start = start;
        for (offset, c) in self.text[start..end].char_indices() {
            match c {
                GROUP_OPEN => depth += 1,
                GROUP_CLOSE => depth = depth.saturating_sub(1),
                SIBLING_SEPARATOR if depth == 0 => {
                    segments.push((segment_start, start + offset));
                    segment_start = start + offset + 1;
                }
                _ => {}
            }
        }
        segments.push((segment_start, end));
        segments
    }

    /// Adds the node to the tree, numbers it and links it to its parent.
    fn attach(&mut self, node: TreeNode, parent: Option<NodeIndex>) -> NodeIndex {
        let index = self.tree.add_node(node);
        self.tree.assign_during_parse(index, parent);
        if let Some(parent) = parent {
            self.tree.add_child(parent, index);
        }
        index
    }

    /// Shrinks `[start, end)` to exclude surrounding whitespace.
    fn trim(&self, start: usize, end: usize) -> (usize, usize) {
        let segment = &self.text[start..end];
        let leading = segment.len() - segment.trim_start().len();
        let trailing = segment.len() - segment.trim_end().len();
        if leading == segment.len() {
            (start, start)
        } else {
            (start + leading, end - trailing)
        }
    }
}
