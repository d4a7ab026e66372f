//! TUI Widgets - stateless renderers over a [`Session`]
//!
//! Layout, top to bottom: header, tree pane, optional status panel, footer.
//! The only thing written back into the session is the tree pane height,
//! which the navigation viewport needs.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::theme::{icons, InspectorTheme};
use crate::session::{RenderRow, Session};

pub const EMPTY_MESSAGE: &str = "Waiting for vehicles... (No data yet)";

const HEADER_HEIGHT: u16 = 3;
const MIN_TREE_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;

const KEY_HELP: &str =
    "↑↓ move  →← open/close  space toggle  e/c all  s status  q quit";

/// Static context the widgets need besides the session
#[derive(Debug, Clone)]
pub struct Chrome {
    /// Where the telemetry comes from
    pub source: String,
    /// Status messages shown in the bottom panel
    pub status_rows: usize,
}

/// Screen regions of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub header: Rect,
    pub tree: Rect,
    pub status: Option<Rect>,
    pub footer: Rect,
}

impl Screen {
    pub fn split(area: Rect, status_rows: Option<usize>) -> Self {
        // Cap the panel so the tree keeps its minimum height
        let spare = area.height.saturating_sub(HEADER_HEIGHT + MIN_TREE_HEIGHT + FOOTER_HEIGHT);
        let status_height = status_rows.map_or(0, |rows| {
            u16::try_from(rows)
                .unwrap_or(u16::MAX)
                .saturating_add(2)
                .min(spare)
        });
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(MIN_TREE_HEIGHT),
                Constraint::Length(status_height),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        Self {
            header: chunks[0],
            tree: chunks[1],
            status: status_rows.map(|_| chunks[2]),
            footer: chunks[3],
        }
    }

    /// Rows available for tree lines inside the pane borders
    pub fn tree_rows(&self) -> usize {
        self.tree.height.saturating_sub(2).max(1) as usize
    }
}

/// Render a frame
pub fn draw(frame: &mut Frame, session: &mut Session, theme: &InspectorTheme, chrome: &Chrome) {
    let status_rows = session.show_status_panel().then_some(chrome.status_rows);
    let screen = Screen::split(frame.area(), status_rows);
    session.set_viewport_height(screen.tree_rows());

    render_header(frame, screen.header, session, theme, chrome);
    render_tree(frame, screen.tree, session, theme);
    if let Some(area) = screen.status {
        render_status(frame, area, session, theme, chrome.status_rows);
    }
    render_footer(frame, screen.footer, session, theme);
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    theme: &InspectorTheme,
    chrome: &Chrome,
) {
    let updated = session
        .last_rebuild()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());

    let header = Line::from(vec![
        Span::styled(&chrome.source, theme.text()),
        Span::raw("  │  "),
        Span::styled(format!("Updated {}", updated), theme.text()),
        Span::raw("  │  "),
        Span::styled(KEY_HELP, theme.dimmed()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.dimmed())
        .title(Span::styled(" MAVLink Inspector ", theme.header()));

    frame.render_widget(Paragraph::new(header).block(block), area);
}

fn render_tree(frame: &mut Frame, area: Rect, session: &Session, theme: &InspectorTheme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.dimmed())
        .title(" Vehicles ");

    let lines: Vec<Line> = if session.rows().is_empty() {
        vec![Line::from(Span::styled(EMPTY_MESSAGE, theme.dimmed()))]
    } else {
        session
            .window()
            .iter()
            .map(|row| tree_line(row, theme))
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn tree_line<'a>(row: &RenderRow, theme: &InspectorTheme) -> Line<'a> {
    let mut style = theme.row(row.kind, row.expandable);
    if row.selected {
        style = style.patch(theme.selected());
    }
    Line::from(vec![
        Span::raw(icons::INDENT.repeat(row.depth)),
        Span::styled(format!("{} {}", glyph(row), row.label), style),
    ])
}

/// Unstyled form of a tree row, as printed by `dump`
pub fn plain_line(row: &RenderRow) -> String {
    format!("{}{} {}", icons::INDENT.repeat(row.depth), glyph(row), row.label)
}

/// `▼` open, `▶` closed, blank for leaves
pub fn glyph(row: &RenderRow) -> &'static str {
    match (row.expandable, row.expanded) {
        (true, true) => icons::EXPANDED,
        (true, false) => icons::COLLAPSED,
        (false, _) => icons::LEAF,
    }
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    theme: &InspectorTheme,
    rows: usize,
) {
    let lines: Vec<Line> = session
        .stores()
        .status
        .tail(rows)
        .iter()
        .map(|msg| Line::from(Span::styled(msg.display_line(), theme.severity(msg.severity))))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.dimmed())
        .title(" Status Messages ");

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, session: &Session, theme: &InspectorTheme) {
    let footer = Line::from(Span::styled(session.status_line(), theme.dimmed()));
    frame.render_widget(Paragraph::new(footer), area);
}
