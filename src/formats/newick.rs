//! Newick tree parser and ASCII renderer.
//!
//! The tree file is produced externally (IQ-TREE) and consumed read-only by
//! the viewer. The parser is a small recursive descent over the Newick
//! grammar: nested parenthesized child lists, optional node labels, optional
//! `:length` branch lengths, terminated by `;`. Internal support labels
//! (e.g. `)95:0.01`) are kept as internal node names.
//!
//! `draw_ascii` reproduces the classic terminal tree drawing: leaves on
//! every other row, underscores for branches, pipes for the vertical
//! connectors, tip labels in the right margin.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur during Newick parsing.
#[derive(Error, Debug)]
pub enum NewickError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty tree file")]
    EmptyFile,

    #[error("Unexpected character '{ch}' at byte {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Invalid branch length at byte {0}")]
    InvalidLength(usize),

    #[error("Trailing data after tree terminator")]
    TrailingData,
}

/// Result type for Newick operations.
pub type NewickResult<T> = Result<T, NewickError>;

/// A node in the tree: a leaf when `children` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node label (tip name, or support value on internal nodes)
    pub name: Option<String>,
    /// Branch length to the parent
    pub length: Option<f64>,
    /// Child nodes, in file order
    pub children: Vec<Node>,
}

impl Node {
    fn leaf(name: Option<String>, length: Option<f64>) -> Self {
        Self {
            name,
            length,
            children: Vec::new(),
        }
    }

    /// Returns true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A parsed phylogenetic tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub root: Node,
}

impl Tree {
    /// Tip names in file order (the order leaves appear on the drawing).
    pub fn leaf_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        fn walk<'a>(node: &'a Node, names: &mut Vec<&'a str>) {
            if node.is_leaf() {
                names.push(node.name.as_deref().unwrap_or(""));
            } else {
                for child in &node.children {
                    walk(child, names);
                }
            }
        }
        walk(&self.root, &mut names);
        names
    }

    /// Number of tips.
    pub fn leaf_count(&self) -> usize {
        self.leaf_names().len()
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> NewickResult<()> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => Err(NewickError::UnexpectedChar {
                pos: self.pos,
                ch: b as char,
            }),
            None => Err(NewickError::UnexpectedEnd),
        }
    }

    fn read_label(&mut self) -> Option<String> {
        self.skip_whitespace();
        let start = self.pos;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'(' | b')' | b',' | b':' | b';' => break,
                b if b.is_ascii_whitespace() => break,
                _ => self.pos += 1,
            }
        }
        if self.pos > start {
            Some(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
        } else {
            None
        }
    }

    fn read_length(&mut self) -> NewickResult<Option<f64>> {
        if self.peek() != Some(b':') {
            return Ok(None);
        }
        self.pos += 1;
        self.skip_whitespace();
        let start = self.pos;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'0'..=b'9' | b'.' | b'-' | b'+' | b'e' | b'E' => self.pos += 1,
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| NewickError::InvalidLength(start))?;
        let value: f64 = text.parse().map_err(|_| NewickError::InvalidLength(start))?;
        Ok(Some(value))
    }

    fn parse_subtree(&mut self) -> NewickResult<Node> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let mut children = vec![self.parse_subtree()?];
                while self.peek() == Some(b',') {
                    self.pos += 1;
                    children.push(self.parse_subtree()?);
                }
                self.expect(b')')?;
                let name = self.read_label();
                let length = self.read_length()?;
                Ok(Node {
                    name,
                    length,
                    children,
                })
            }
            Some(_) => {
                let name = self.read_label();
                let length = self.read_length()?;
                if name.is_none() && length.is_none() {
                    return Err(NewickError::UnexpectedChar {
                        pos: self.pos,
                        ch: self.bytes.get(self.pos).map(|&b| b as char).unwrap_or('?'),
                    });
                }
                Ok(Node::leaf(name, length))
            }
            None => Err(NewickError::UnexpectedEnd),
        }
    }

    fn parse_tree(&mut self) -> NewickResult<Tree> {
        let root = self.parse_subtree()?;
        self.expect(b';')?;
        self.skip_whitespace();
        if self.pos != self.bytes.len() {
            return Err(NewickError::TrailingData);
        }
        Ok(Tree { root })
    }
}

/// Parses a Newick tree from a string.
pub fn parse_str(input: &str) -> NewickResult<Tree> {
    if input.trim().is_empty() {
        return Err(NewickError::EmptyFile);
    }
    Parser::new(input.trim()).parse_tree()
}

/// Parses a Newick tree file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> NewickResult<Tree> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

// --- ASCII drawing ---------------------------------------------------------

// Flat arena view used only for layout; keyed by pre-order index.
struct Layout<'a> {
    names: Vec<Option<&'a str>>,
    children: Vec<Vec<usize>>,
    depths: Vec<f64>,
    leaves: Vec<usize>,
}

fn flatten<'a>(node: &'a Node, depth: f64, unit: bool, layout: &mut Layout<'a>) -> usize {
    let depth = depth
        + if unit {
            1.0
        } else {
            node.length.unwrap_or(0.0)
        };
    let id = layout.names.len();
    layout.names.push(node.name.as_deref());
    layout.children.push(Vec::new());
    layout.depths.push(depth);
    if node.is_leaf() {
        layout.leaves.push(id);
    }
    for child in &node.children {
        let child_id = flatten(child, depth, unit, layout);
        layout.children[id].push(child_id);
    }
    id
}

/// Renders the tree as ASCII art, one string per line.
///
/// Column positions are proportional to cumulative branch length (unit
/// lengths when the tree carries none); each tip occupies every other row
/// with its label in the right margin.
pub fn draw_ascii(tree: &Tree, column_width: usize) -> Vec<String> {
    let mut layout = Layout {
        names: Vec::new(),
        children: Vec::new(),
        depths: Vec::new(),
        leaves: Vec::new(),
    };
    // Unit depths when no branch carries a length
    let has_lengths = {
        fn any_length(node: &Node) -> bool {
            node.length.is_some() || node.children.iter().any(any_length)
        }
        any_length(&tree.root)
    };
    flatten(&tree.root, 0.0, !has_lengths, &mut layout);

    let n_leaves = layout.leaves.len();
    if n_leaves == 0 {
        return Vec::new();
    }

    let max_label = layout
        .leaves
        .iter()
        .map(|&id| layout.names[id].map_or(0, str::len))
        .max()
        .unwrap_or(0);
    let drawing_width = column_width.saturating_sub(max_label + 1).max(10);
    let drawing_height = 2 * n_leaves - 1;

    let max_depth = layout.depths.iter().cloned().fold(0.0_f64, f64::max);
    let fudge = (n_leaves as f64).log2();
    let cols_per_unit = (drawing_width as f64 - fudge) / max_depth.max(f64::MIN_POSITIVE);

    let cols: Vec<usize> = layout
        .depths
        .iter()
        .map(|d| ((d * cols_per_unit + 1.0) as usize).min(drawing_width - 1))
        .collect();

    // Leaves sit on even rows; internal nodes midway between their first
    // and last child.
    let mut rows = vec![0usize; layout.names.len()];
    for (idx, &leaf) in layout.leaves.iter().enumerate() {
        rows[leaf] = 2 * idx;
    }
    fn calc_rows(id: usize, children: &[Vec<usize>], rows: &mut [usize]) {
        for &child in &children[id] {
            calc_rows(child, children, rows);
        }
        if let (Some(&first), Some(&last)) = (children[id].first(), children[id].last()) {
            rows[id] = (rows[first] + rows[last]) / 2;
        }
    }
    calc_rows(0, &layout.children, &mut rows);

    let mut canvas = vec![vec![' '; drawing_width]; drawing_height];
    fn draw_node(
        id: usize,
        start_col: usize,
        layout: &Layout,
        cols: &[usize],
        rows: &[usize],
        canvas: &mut [Vec<char>],
    ) {
        let this_col = cols[id];
        let this_row = rows[id];
        for col in start_col..this_col {
            canvas[this_row][col] = '_';
        }
        if let (Some(&first), Some(&last)) =
            (layout.children[id].first(), layout.children[id].last())
        {
            for row in (rows[first] + 1)..=rows[last] {
                canvas[row][this_col] = '|';
            }
            // Keep a mark where a zero-width branch would leave the
            // connector dangling
            if cols[first].saturating_sub(this_col) < 2 {
                canvas[rows[first]][this_col] = ',';
            }
            for &child in &layout.children[id] {
                draw_node(child, this_col + 1, layout, cols, rows, canvas);
            }
        }
    }
    draw_node(0, 0, &layout, &cols, &rows, &mut canvas);

    let mut lines = Vec::with_capacity(drawing_height);
    for (idx, row) in canvas.iter().enumerate() {
        let mut line: String = row.iter().collect::<String>().trim_end().to_string();
        if idx % 2 == 0 {
            let leaf = layout.leaves[idx / 2];
            if let Some(name) = layout.names[leaf] {
                line.push(' ');
                line.push_str(name);
            }
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_tree() {
        let tree = parse_str("(A:0.1,B:0.2):0.0;").unwrap();
        assert_eq!(tree.leaf_names(), vec!["A", "B"]);
        assert_eq!(tree.root.children[0].length, Some(0.1));
    }

    #[test]
    fn test_parse_nested_with_support() {
        let tree = parse_str("((A:0.1,B:0.2)95:0.05,C:0.3);").unwrap();
        assert_eq!(tree.leaf_names(), vec!["A", "B", "C"]);
        assert_eq!(tree.root.children[0].name.as_deref(), Some("95"));
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_parse_without_lengths() {
        let tree = parse_str("(A,(B,C));").unwrap();
        assert_eq!(tree.leaf_names(), vec!["A", "B", "C"]);
        assert!(tree.root.children[0].length.is_none());
    }

    #[test]
    fn test_parse_scientific_notation_length() {
        let tree = parse_str("(A:1e-6,B:2.5E-3);").unwrap();
        assert_eq!(tree.root.children[0].length, Some(1e-6));
    }

    #[test]
    fn test_missing_semicolon() {
        assert!(parse_str("(A,B)").is_err());
    }

    #[test]
    fn test_trailing_data() {
        assert!(matches!(
            parse_str("(A,B);(C,D);"),
            Err(NewickError::TrailingData)
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_str("  \n"), Err(NewickError::EmptyFile)));
    }

    #[test]
    fn test_draw_ascii_labels_on_even_rows() {
        let tree = parse_str("((A:0.1,B:0.2):0.05,C:0.3);").unwrap();
        let lines = draw_ascii(&tree, 60);

        assert_eq!(lines.len(), 5); // 3 tips, 2 spacer rows
        assert!(lines[0].ends_with(" A"));
        assert!(lines[2].ends_with(" B"));
        assert!(lines[4].ends_with(" C"));
        // The row below the (A,B) clade carries only the root connector
        assert!(lines[3].chars().all(|c| c == ' ' || c == '|'));
        assert!(lines[3].contains('|'));
    }

    #[test]
    fn test_draw_ascii_branch_glyphs() {
        let tree = parse_str("(A:1,B:1);").unwrap();
        let lines = draw_ascii(&tree, 40);
        assert!(lines[0].contains('_'));
        assert!(lines.iter().any(|l| l.contains('|') || l.contains(',')));
    }

    #[test]
    fn test_draw_ascii_unit_lengths() {
        let tree = parse_str("(A,B);").unwrap();
        let lines = draw_ascii(&tree, 40);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" A"));
    }
}
