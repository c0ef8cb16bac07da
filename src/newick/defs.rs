//! Constants for Newick parsing and writing.

/// Opens a children list
pub(crate) const GROUP_OPEN: char = '(';

/// Closes a children list
pub(crate) const GROUP_CLOSE: char = ')';

/// Separates siblings
pub(crate) const SIBLING_SEPARATOR: char = ',';

/// Separates a label from its branch length
pub(crate) const LENGTH_SEPARATOR: char = ':';

/// Ends a complete tree
pub(crate) const TERMINATOR: char = ';';

/// Default guess for number of leaves, when unknown
pub(crate) const DEFAULT_NUM_LEAVES_GUESS: usize = 10;
