/// Columns of indentation per tree depth level
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Deepest category level rendered before the tree is considered corrupt
pub const DEFAULT_MAX_TREE_DEPTH: usize = 32;

/// Banner text when a failure carries no usable server message
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// TREE GLYPHS
// =============================================================================

pub const GLYPH_EXPANDED: &str = "▾";
pub const GLYPH_COLLAPSED: &str = "▸";
/// Same display width as the toggle glyphs so labels line up
pub const GLYPH_SPACER: &str = " ";
