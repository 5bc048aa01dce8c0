//! TUI rendering module.
//!
//! All visual rendering with ratatui:
//! - identifier input box on top
//! - phylogenetic tree panel in the body
//! - alignment-statistics and search-hit panels side by side at the bottom
//! - footer hint line
//! - centered "not found" alert modal while the alert deadline runs

pub mod tree;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::AppState;

/// Height of the input box (content + borders).
const INPUT_HEIGHT: u16 = 3;
/// Height of the footer hint line.
const FOOTER_HEIGHT: u16 = 1;
/// Share of the vertical space given to the bottom panel pair, in percent.
const BOTTOM_PANEL_PERCENT: u16 = 35;

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Min(3),
            Constraint::Percentage(BOTTOM_PANEL_PERCENT),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    let bottom_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_layout[2]);

    render_input(frame, state, main_layout[0]);
    render_tree(frame, state, main_layout[1]);
    render_stats(frame, state, bottom_layout[0]);
    render_hits(frame, state, bottom_layout[1]);
    render_footer(frame, state, main_layout[3]);

    if state.alert_active() {
        render_alert(frame, area);
    }
}

/// Renders the identifier input box.
fn render_input(frame: &mut Frame, state: &AppState, area: Rect) {
    let line = Line::from(vec![
        Span::raw(state.input.as_str()),
        Span::styled("█", Style::default().fg(Color::DarkGray)),
    ]);
    let block = Block::default().borders(Borders::ALL).title("Tip name");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Renders the tree panel; labels are styled distinctly from the branch
/// glyphs, and the selected tip is highlighted.
fn render_tree(frame: &mut Frame, state: &AppState, area: Rect) {
    let lines: Vec<Line> = state
        .tree_lines
        .iter()
        .map(|tree_line| {
            let selected = state
                .selected
                .as_deref()
                .is_some_and(|id| id == tree_line.label);
            let label_style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            Line::from(vec![
                Span::styled(
                    tree_line.branch.clone(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(tree_line.label.clone(), label_style),
            ])
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title("Tree");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the alignment-statistics panel: header row plus the matching
/// data row, columns aligned.
fn render_stats(frame: &mut Frame, state: &AppState, area: Rect) {
    let lines: Vec<Line> = match &state.stats.table {
        Some((header, row)) => format_stats_rows(header, row)
            .into_iter()
            .map(Line::from)
            .collect(),
        None => vec![Line::from(Span::styled(
            state.stats.message.as_deref().unwrap_or("").to_string(),
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Alignment statistics");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One line per column: `name: value`, names padded to a common width.
fn format_stats_rows(header: &[String], row: &[String]) -> Vec<String> {
    let name_width = header.iter().map(|h| h.len()).max().unwrap_or(0);
    header
        .iter()
        .zip(row)
        .map(|(name, value)| format!("{name:<name_width$}  {value}"))
        .collect()
}

/// Renders the search-hit panel, wrapping long lines to the panel width.
fn render_hits(frame: &mut Frame, state: &AppState, area: Rect) {
    let width = area.width.saturating_sub(2).max(1) as usize;
    let lines: Vec<Line> = state
        .hits
        .text
        .iter()
        .flat_map(|raw| textwrap::wrap(raw, width))
        .map(|wrapped| Line::from(wrapped.into_owned()))
        .collect();

    let block = Block::default().borders(Borders::ALL).title("Search hits");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the footer hint line.
fn render_footer(frame: &mut Frame, state: &AppState, area: Rect) {
    let text = match &state.status_message {
        Some(message) => format!(" {message} "),
        None => " Type a tip name, Enter to show, Esc to quit ".to_string(),
    };
    let line = Line::from(Span::styled(
        text,
        Style::default().fg(Color::Black).bg(Color::Cyan),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the transient "not found" modal over the rest of the UI.
fn render_alert(frame: &mut Frame, area: Rect) {
    let modal = centered_rect(30, 3, area);
    let text = Line::from(Span::styled(
        "Sequence not found!",
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    ));
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Clear, modal);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        modal,
    );
}

/// Centers a fixed-size rectangle within `area`, clamped to its bounds.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_rows_are_column_aligned() {
        let header = vec!["seqName".to_string(), "initialSeqLength".to_string()];
        let row = vec!["Example_1234".to_string(), "642".to_string()];
        let lines = format_stats_rows(&header, &row);

        assert_eq!(lines.len(), 2);
        // Names padded to the widest name, values start in the same column
        assert_eq!(lines[0], format!("{:<16}  Example_1234", "seqName"));
        assert_eq!(lines[1], "initialSeqLength  642");
        assert_eq!(lines[0].find("Example").unwrap(), lines[1].find("642").unwrap());
    }

    #[test]
    fn test_centered_rect_is_within_bounds() {
        let area = Rect::new(0, 0, 100, 40);
        let modal = centered_rect(30, 3, area);
        assert_eq!(modal.width, 30);
        assert_eq!(modal.height, 3);
        assert_eq!(modal.x, 35);
        assert_eq!(modal.y, 18);
    }

    #[test]
    fn test_centered_rect_clamps_to_small_area() {
        let area = Rect::new(0, 0, 20, 2);
        let modal = centered_rect(30, 3, area);
        assert!(modal.width <= area.width);
        assert!(modal.height <= area.height);
    }
}
