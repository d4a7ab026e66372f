//! Inspector Theme - colours, styles and glyphs

use ratatui::style::{Color, Modifier, Style};

use crate::tree::NodeKind;

/// Inspector color palette
pub struct InspectorTheme {
    pub branch: Color,
    pub leaf: Color,
    pub title: Color,
    pub text: Color,

    // Status colors
    pub warning: Color,
    pub error: Color,
    pub dim: Color,
}

impl Default for InspectorTheme {
    fn default() -> Self {
        Self {
            branch: Color::Cyan,
            leaf: Color::Green,
            title: Color::Rgb(255, 191, 0), // #FFBF00
            text: Color::Reset,

            warning: Color::Yellow,
            error: Color::Red,
            dim: Color::Rgb(128, 128, 128),
        }
    }
}

impl InspectorTheme {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Styles
    // ─────────────────────────────────────────────────────────────────────

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dim)
    }

    /// Bold header style
    pub fn header(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    /// Tree row style: cyan for anything with children, green for leaves
    pub fn row(&self, kind: NodeKind, expandable: bool) -> Style {
        let style = if expandable {
            Style::default().fg(self.branch)
        } else {
            Style::default().fg(self.leaf)
        };
        match kind {
            NodeKind::Source => style.add_modifier(Modifier::BOLD),
            _ => style,
        }
    }

    /// Applied on top of the row style
    pub fn selected(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    /// Status text colour by severity: 0-3 error, 4 warning, else normal
    pub fn severity(&self, severity: Option<u8>) -> Style {
        match severity {
            Some(s) if s <= 3 => Style::default()
                .fg(self.error)
                .add_modifier(Modifier::BOLD),
            Some(4) => Style::default().fg(self.warning),
            _ => self.text(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Icons and Symbols
// ─────────────────────────────────────────────────────────────────────────────

pub mod icons {
    pub const EXPANDED: &str = "▼";
    pub const COLLAPSED: &str = "▶";
    pub const LEAF: &str = " ";

    /// Indent per tree depth
    pub const INDENT: &str = "  ";
}
