//! Data model for the result viewer.
//!
//! The viewer is a read-only consumer of the pipeline artifacts: the
//! per-sequence statistics table, the search-output directory, and the
//! tree file. Interaction is a small state machine: idle, waiting for an
//! identifier; on submit the identifier is validated against the
//! statistics table; unknown identifiers raise a transient alert, known
//! ones are pushed to every registered panel.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::{BLASTOUT_DIR, SEQ_STATS_CSV, TREE_DIR, TREE_FILE};
use crate::formats::{blast_xml, newick, seq_stats};
use crate::ui::tree::{split_glyphs, TreeLine};

/// How long the "not found" alert stays visible.
pub const ALERT_DURATION: Duration = Duration::from_secs(2);

/// Width budget for the ASCII tree drawing.
const TREE_RENDER_WIDTH: usize = 100;

/// Where the viewer reads its artifacts from.
#[derive(Debug, Clone)]
pub struct ViewerPaths {
    /// Per-sequence statistics table
    pub seq_stats: PathBuf,
    /// Directory of search output files
    pub blastout_dir: PathBuf,
    /// Newick tree file
    pub tree_file: PathBuf,
}

impl ViewerPaths {
    /// The layout the pipeline produces in the working directory.
    pub fn from_layout(alignment_dir: &Path, blastout_dir: &Path, tree_file: &Path) -> Self {
        Self {
            seq_stats: alignment_dir.join(SEQ_STATS_CSV),
            blastout_dir: blastout_dir.to_path_buf(),
            tree_file: tree_file.to_path_buf(),
        }
    }
}

impl Default for ViewerPaths {
    fn default() -> Self {
        Self::from_layout(
            Path::new(crate::config::ALIGNMENT_DIR),
            Path::new(BLASTOUT_DIR),
            &Path::new(TREE_DIR).join(TREE_FILE),
        )
    }
}

/// Viewer interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Waiting for input
    Idle,
    /// "Not found" alert visible until the deadline passes
    Alert { until: Instant },
}

/// A validated identifier, the payload delivered to update subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedId(pub String);

/// A panel that refreshes when a new identifier is validated.
///
/// Panels register in [`AppState::subscribers`]; the input component only
/// ever talks to this trait, never to a concrete panel type.
pub trait Subscriber {
    fn notify(&mut self, selection: &SelectedId, paths: &ViewerPaths);
}

/// Alignment-statistics panel: header plus the matching row.
#[derive(Debug, Default)]
pub struct StatsPanel {
    /// Header and data row for the selected identifier
    pub table: Option<(Vec<String>, Vec<String>)>,
    /// Shown while no identifier is selected, or on read failure
    pub message: Option<String>,
}

impl Subscriber for StatsPanel {
    fn notify(&mut self, selection: &SelectedId, paths: &ViewerPaths) {
        match seq_stats::lookup(&paths.seq_stats, &selection.0) {
            Ok(Some(table)) => {
                self.table = Some(table);
                self.message = None;
            }
            Ok(None) => {
                // Validation happens before dispatch; a vanished row means
                // the table changed underneath us
                self.table = None;
                self.message = Some(format!("No statistics for '{}'", selection.0));
            }
            Err(err) => {
                self.table = None;
                self.message = Some(format!("Failed to read statistics: {err}"));
            }
        }
    }
}

/// Search-hit panel: the first matching hit across the output files.
#[derive(Debug, Default)]
pub struct HitsPanel {
    /// Raw text lines describing the hit
    pub text: Vec<String>,
}

impl Subscriber for HitsPanel {
    fn notify(&mut self, selection: &SelectedId, paths: &ViewerPaths) {
        self.text = match find_first_hit(&paths.blastout_dir, &selection.0) {
            Some(text) => text,
            None => vec![format!("No search hit found for '{}'", selection.0)],
        };
    }
}

/// Scans the search outputs for the first hit matching the identifier.
///
/// Stops at the first match; hits for the same identifier in later files
/// are not aggregated.
fn find_first_hit(out_dir: &Path, id: &str) -> Option<Vec<String>> {
    let mut entries: Vec<_> = std::fs::read_dir(out_dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let output = match blast_xml::parse_file(&path) {
            Ok(output) => output,
            Err(_) => continue,
        };
        for hit in output.hits() {
            if hit.identifier() != id {
                continue;
            }
            return Some(format_hit(&path, &output.program, hit));
        }
    }
    None
}

fn format_hit(path: &Path, program: &str, hit: &blast_xml::Hit) -> Vec<String> {
    let mut lines = vec![
        format!("File: {}", path.display()),
        format!("Program: {}", program),
        format!("Hit {}: {}", hit.num, hit.def),
        format!("Subject length: {}", hit.len),
    ];
    for hsp in hit.hsps() {
        lines.push(format!(
            "HSP {}: bit score {:.1}, e-value {:.3e}",
            hsp.num, hsp.bit_score, hsp.evalue
        ));
        lines.push(format!(
            "  identity {}/{}, gaps {}",
            hsp.identity, hsp.align_len, hsp.gaps
        ));
        lines.push(format!(
            "  query {}-{}, subject {}-{}",
            hsp.query_from, hsp.query_to, hsp.hit_from, hsp.hit_to
        ));
    }
    lines
}

/// The complete viewer state.
#[derive(Debug)]
pub struct AppState {
    /// Artifact locations
    pub paths: ViewerPaths,
    /// Identifier input buffer
    pub input: String,
    /// Current interaction mode
    pub mode: ViewMode,
    /// Tree drawing, rendered once at startup
    pub tree_lines: Vec<TreeLine>,
    /// Statistics panel
    pub stats: StatsPanel,
    /// Search-hit panel
    pub hits: HitsPanel,
    /// Last validated identifier
    pub selected: Option<String>,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Status message shown in the footer
    pub status_message: Option<String>,
}

impl AppState {
    /// Creates the viewer state, rendering the tree panel once.
    ///
    /// A missing or malformed tree file degrades to a placeholder line
    /// rather than preventing startup; the other panels stay usable.
    pub fn new(paths: ViewerPaths) -> Self {
        let tree_lines = match newick::parse_file(&paths.tree_file) {
            Ok(tree) => newick::draw_ascii(&tree, TREE_RENDER_WIDTH)
                .iter()
                .map(|line| split_glyphs(line))
                .collect(),
            Err(err) => vec![TreeLine {
                branch: String::new(),
                label: format!("Tree unavailable ({}): {}", paths.tree_file.display(), err),
            }],
        };

        Self {
            paths,
            input: String::new(),
            mode: ViewMode::Idle,
            tree_lines,
            stats: StatsPanel {
                table: None,
                message: Some("Enter a tip name to show alignment statistics".to_string()),
            },
            hits: HitsPanel {
                text: vec!["Enter a tip name to show search hits".to_string()],
            },
            selected: None,
            should_quit: false,
            status_message: None,
        }
    }

    /// The update-subscriber registry.
    fn subscribers(&mut self) -> [&mut dyn Subscriber; 2] {
        [&mut self.stats, &mut self.hits]
    }

    /// Appends a character to the input buffer.
    pub fn input_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Removes the last character from the input buffer.
    pub fn input_backspace(&mut self) {
        self.input.pop();
    }

    /// Validates the entered identifier and refreshes the panels.
    ///
    /// Unknown identifiers raise the transient alert and leave every panel
    /// unchanged; the tree panel never changes either way.
    pub fn submit(&mut self) {
        let id = self.input.trim().to_string();
        if id.is_empty() {
            return;
        }

        let found = match seq_stats::contains(&self.paths.seq_stats, &id) {
            Ok(found) => found,
            Err(err) => {
                self.status_message = Some(format!("Failed to read statistics table: {err}"));
                false
            }
        };
        if !found {
            self.mode = ViewMode::Alert {
                until: Instant::now() + ALERT_DURATION,
            };
            return;
        }

        let selection = SelectedId(id);
        let paths = self.paths.clone();
        for subscriber in self.subscribers() {
            subscriber.notify(&selection, &paths);
        }
        self.selected = Some(selection.0);
        self.input.clear();
        self.status_message = None;
    }

    /// Returns true while the "not found" alert is visible.
    pub fn alert_active(&self) -> bool {
        matches!(self.mode, ViewMode::Alert { .. })
    }

    /// Dismisses the alert immediately.
    pub fn dismiss_alert(&mut self) {
        self.mode = ViewMode::Idle;
    }

    /// Clock tick: dismisses an expired alert.
    ///
    /// The deadline is checked on the event-loop tick so the UI keeps
    /// polling input while the alert is visible.
    pub fn tick(&mut self) {
        if let ViewMode::Alert { until } = self.mode {
            if Instant::now() >= until {
                self.mode = ViewMode::Idle;
            }
        }
    }
}
