//! Session - the explicit context behind one inspector run
//!
//! Owns the shared stores handle plus everything the UI side mutates:
//! the current tree, its visible rows, the expansion set and navigation.
//! The ingestion task only ever sees `Arc<Stores>`.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::nav::NavigationController;
use crate::store::Stores;
use crate::tree::{flatten, ExpansionState, NodeId, NodeKind, Tree, TreeBuilder, VisibleRows};

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Logical input commands, already mapped from raw keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Home,
    End,
    Expand,
    Collapse,
    Toggle,
    ExpandAll,
    CollapseAll,
    ToggleStatusPanel,
    Quit,
}

/// Whether the session keeps running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// ─────────────────────────────────────────────────────────────────────────────
// Render contract
// ─────────────────────────────────────────────────────────────────────────────

/// One display line handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    pub depth: usize,
    pub label: String,
    pub selected: bool,
    pub expandable: bool,
    pub expanded: bool,
    pub kind: NodeKind,
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Session {
    stores: Arc<Stores>,
    tree: Tree,
    rows: VisibleRows,
    expansion: ExpansionState,
    nav: NavigationController,
    show_status_panel: bool,
    last_rebuild: Option<DateTime<Local>>,
}

impl Session {
    pub fn new(stores: Arc<Stores>) -> Self {
        Self {
            stores,
            tree: Tree::default(),
            rows: VisibleRows::default(),
            expansion: ExpansionState::new(),
            nav: NavigationController::default(),
            show_status_panel: true,
            last_rebuild: None,
        }
    }

    pub fn with_status_panel(mut self, visible: bool) -> Self {
        self.show_status_panel = visible;
        self
    }

    /// Snapshot the stores and rebuild the tree.
    ///
    /// Expansion and selection carry over by identity.
    pub fn rebuild(&mut self) {
        let tree = TreeBuilder::from_stores(&self.stores);
        self.install(tree);
        self.last_rebuild = Some(Local::now());
        debug!(
            nodes = self.tree.len(),
            visible = self.rows.len(),
            "tree rebuilt"
        );
    }

    /// Swap in an already built tree
    pub fn install(&mut self, tree: Tree) {
        self.tree = tree;
        self.refresh();
    }

    /// Apply one input command
    pub fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Quit,
            Command::ToggleStatusPanel => self.show_status_panel = !self.show_status_panel,
            Command::MoveUp => {
                self.nav.move_up(&self.rows);
            }
            Command::MoveDown => {
                self.nav.move_down(&self.rows);
            }
            Command::PageUp => {
                self.nav.page_up(&self.rows);
            }
            Command::PageDown => {
                self.nav.page_down(&self.rows);
            }
            Command::Home => {
                self.nav.home(&self.rows);
            }
            Command::End => {
                self.nav.end(&self.rows);
            }
            Command::Expand => self.expand_selected(),
            Command::Collapse => self.collapse_selected(),
            Command::Toggle => self.toggle_selected(),
            Command::ExpandAll => {
                self.expansion.expand_all(&self.tree);
                self.refresh();
            }
            Command::CollapseAll => {
                self.expansion.collapse_all();
                self.refresh();
            }
        }
        Flow::Continue
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.nav.set_viewport_height(height, &self.rows);
    }

    /// Rows inside the viewport
    pub fn window(&self) -> Vec<RenderRow> {
        self.render_range(self.nav.window(&self.rows))
    }

    /// Every visible row, ignoring the viewport
    pub fn all_rows(&self) -> Vec<RenderRow> {
        self.render_range(0..self.rows.len())
    }

    /// `Selected: i/n | Vehicles: k | Status msgs: m`
    pub fn status_line(&self) -> String {
        let selected = self.nav.selected_index().map_or(0, |i| i + 1);
        format!(
            "Selected: {}/{} | Vehicles: {} | Status msgs: {}",
            selected,
            self.rows.len(),
            self.tree.roots().len(),
            self.stores.status.len()
        )
    }

    pub fn stores(&self) -> &Arc<Stores> {
        &self.stores
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn rows(&self) -> &VisibleRows {
        &self.rows
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.nav.selected()
    }

    pub fn show_status_panel(&self) -> bool {
        self.show_status_panel
    }

    pub fn last_rebuild(&self) -> Option<DateTime<Local>> {
        self.last_rebuild
    }

    fn expand_selected(&mut self) {
        let Some(id) = self.nav.selected().cloned() else {
            return;
        };
        if self.expansion.expand(&self.tree, &id) {
            self.refresh();
        }
    }

    /// Collapse if open, otherwise jump to the parent
    fn collapse_selected(&mut self) {
        let Some(id) = self.nav.selected().cloned() else {
            return;
        };
        if self.expansion.is_open(&self.tree, &id) && self.expansion.collapse(&id) {
            self.refresh();
        } else if let Some(parent) = id.parent() {
            self.nav.select(&parent, &self.rows);
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.nav.selected().cloned() else {
            return;
        };
        if self.expansion.toggle(&self.tree, &id) {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        self.rows = flatten(&self.tree, &self.expansion);
        self.nav.resolve(&self.rows);
    }

    fn render_range(&self, range: std::ops::Range<usize>) -> Vec<RenderRow> {
        let selected = self.nav.selected_index();
        range
            .filter_map(|pos| {
                let row = self.rows.get(pos)?;
                let node = self.tree.get(&row.id)?;
                Some(RenderRow {
                    depth: row.depth,
                    label: node.label.clone(),
                    selected: selected == Some(pos),
                    expandable: node.expandable,
                    expanded: node.expandable && self.expansion.is_open(&self.tree, &row.id),
                    kind: node.kind,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RecordValue, SourceKey, TelemetryEvent};

    fn record(type_name: &str, value: RecordValue, timestamp: f64) -> TelemetryEvent {
        TelemetryEvent::Record {
            source: SourceKey::new(1, 1),
            type_name: type_name.into(),
            value,
            timestamp,
        }
    }

    fn session() -> Session {
        let stores = Arc::new(Stores::default());
        stores.apply(record(
            "SYS_STATUS",
            RecordValue::MultiLineText(vec!["a".into(), "b".into(), "c".into()]),
            0.0,
        ));
        let mut session = Session::new(stores);
        session.set_viewport_height(20);
        session.rebuild();
        session
    }

    fn labels(session: &Session) -> Vec<String> {
        session.all_rows().into_iter().map(|r| r.label).collect()
    }

    #[test]
    fn collapsed_view_shows_root_and_categories() {
        let session = session();
        assert_eq!(labels(&session), vec!["1:1", "Messages", "Parameters"]);
        assert_eq!(session.selected().unwrap().as_str(), "1:1");
        assert!(session.all_rows()[0].selected);
    }

    #[test]
    fn expand_then_collapse_selected() {
        let mut session = session();
        session.apply(Command::MoveDown);
        session.apply(Command::Expand);
        assert_eq!(session.rows().len(), 4);

        session.apply(Command::MoveDown);
        let before = session.rows().len();
        session.apply(Command::Expand);
        assert_eq!(session.rows().len(), before + 3);
        assert_eq!(
            session.selected().unwrap().as_str(),
            "1:1/Messages/SYS_STATUS"
        );

        session.apply(Command::Collapse);
        assert_eq!(session.rows().len(), before);
        assert_eq!(
            session.selected().unwrap().as_str(),
            "1:1/Messages/SYS_STATUS"
        );
    }

    #[test]
    fn collapse_on_leaf_jumps_to_parent() {
        let mut session = session();
        session.apply(Command::ExpandAll);
        for _ in 0..3 {
            session.apply(Command::MoveDown);
        }
        assert_eq!(
            session.selected().unwrap().as_str(),
            "1:1/Messages/SYS_STATUS/000"
        );

        session.apply(Command::Collapse);
        assert_eq!(
            session.selected().unwrap().as_str(),
            "1:1/Messages/SYS_STATUS"
        );
        // Still expanded: the jump does not collapse anything.
        assert_eq!(session.rows().len(), 7);
    }

    #[test]
    fn collapse_on_root_is_a_noop() {
        let mut session = session();
        session.apply(Command::Collapse);
        assert_eq!(session.selected().unwrap().as_str(), "1:1");
        assert_eq!(session.rows().len(), 3);
    }

    #[test]
    fn toggle_does_not_jump() {
        let mut session = session();
        session.apply(Command::MoveDown);
        session.apply(Command::MoveDown);
        session.apply(Command::Toggle);
        assert_eq!(session.selected().unwrap().as_str(), "1:1/Parameters");
        assert_eq!(session.rows().len(), 3);
    }

    #[test]
    fn collapse_all_reselects_visible_ancestor() {
        let mut session = session();
        session.apply(Command::ExpandAll);
        session.apply(Command::End);
        session.apply(Command::MoveUp);
        assert_eq!(
            session.selected().unwrap().as_str(),
            "1:1/Messages/SYS_STATUS/002"
        );

        session.apply(Command::CollapseAll);
        assert_eq!(session.rows().len(), 3);
        assert_eq!(session.selected().unwrap().as_str(), "1:1/Messages");
    }

    #[test]
    fn selection_survives_rebuild_when_rows_shift() {
        let mut session = session();
        session.apply(Command::ExpandAll);
        session.apply(Command::End);
        assert_eq!(session.selected().unwrap().as_str(), "1:1/Parameters");

        session.stores().apply(record(
            "ATTITUDE",
            RecordValue::fields([("roll", 0.1), ("pitch", 0.2)]),
            0.0,
        ));
        session.rebuild();

        assert_eq!(session.selected().unwrap().as_str(), "1:1/Parameters");
        assert_eq!(session.navigation().selected_index(), Some(session.rows().len() - 1));
    }

    #[test]
    fn commands_on_empty_session_are_noops() {
        let mut session = Session::new(Arc::new(Stores::default()));
        session.rebuild();
        for command in [
            Command::MoveDown,
            Command::MoveUp,
            Command::Expand,
            Command::Collapse,
            Command::Toggle,
            Command::ExpandAll,
            Command::CollapseAll,
            Command::End,
        ] {
            assert_eq!(session.apply(command), Flow::Continue);
        }
        assert!(session.window().is_empty());
        assert_eq!(
            session.status_line(),
            "Selected: 0/0 | Vehicles: 0 | Status msgs: 0"
        );
    }

    #[test]
    fn quit_and_status_panel_toggle() {
        let mut session = session();
        assert!(session.show_status_panel());
        assert_eq!(session.apply(Command::ToggleStatusPanel), Flow::Continue);
        assert!(!session.show_status_panel());
        assert_eq!(session.apply(Command::Quit), Flow::Quit);
    }

    #[test]
    fn window_marks_selected_row() {
        let mut session = session();
        session.set_viewport_height(2);
        session.apply(Command::MoveDown);
        session.apply(Command::MoveDown);

        let window = session.window();
        assert_eq!(window.len(), 2);
        assert_eq!(window[1].label, "Parameters");
        assert!(window[1].selected);
        assert!(!window[0].selected);
        assert_eq!(
            session.status_line(),
            "Selected: 3/3 | Vehicles: 1 | Status msgs: 0"
        );
    }
}
