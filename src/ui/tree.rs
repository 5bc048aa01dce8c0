//! Tree-drawing line decomposition.
//!
//! Each line of the ASCII tree drawing is split at the boundary between
//! the leading branch-drawing glyphs (underscores, pipes, commas, spaces)
//! and the tip label, so the label can be styled distinctly from the
//! branches.

/// One display line of the tree panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeLine {
    /// Leading non-alphabetic tree-drawing glyphs
    pub branch: String,
    /// The tip label (empty on connector-only lines)
    pub label: String,
}

/// Splits a drawing line at the first alphabetic character.
///
/// Everything before it is branch drawing; everything from it onward is
/// the label. A line with no alphabetic character is all branch.
pub fn split_glyphs(line: &str) -> TreeLine {
    match line.find(|c: char| c.is_alphabetic()) {
        Some(idx) => TreeLine {
            branch: line[..idx].to_string(),
            label: line[idx..].to_string(),
        },
        None => TreeLine {
            branch: line.to_string(),
            label: String::new(),
        },
    }
}
