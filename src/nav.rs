//! NavigationController - selection + viewport over the visible rows
//!
//! The selection is an identity. Its index is recomputed against every new
//! `VisibleRows`, falling back up the ancestor chain when the node is gone.

use std::ops::Range;

use crate::tree::{NodeId, VisibleRows};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationController {
    selected: Option<NodeId>,
    pos: usize,
    top: usize,
    height: usize,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(1)
    }
}

impl NavigationController {
    /// Heights below one are clamped to one
    pub fn new(height: usize) -> Self {
        Self {
            selected: None,
            pos: 0,
            top: 0,
            height: height.max(1),
        }
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Index of the selection in the rows it was last resolved against
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.as_ref().map(|_| self.pos)
    }

    pub fn viewport_top(&self) -> usize {
        self.top
    }

    pub fn viewport_height(&self) -> usize {
        self.height
    }

    /// Resize the viewport and scroll so the selection stays visible
    pub fn set_viewport_height(&mut self, height: usize, rows: &VisibleRows) {
        self.height = height.max(1);
        self.scroll_into_view(rows.len());
    }

    /// Re-anchor the selected identity in `rows`.
    ///
    /// Walks up the ancestor chain when the node is no longer visible and
    /// falls back to the first row when none of them is.
    pub fn resolve(&mut self, rows: &VisibleRows) {
        if rows.is_empty() {
            self.selected = None;
            self.pos = 0;
            self.top = 0;
            return;
        }

        let pos = self
            .selected
            .as_ref()
            .and_then(|id| {
                std::iter::once(id.clone())
                    .chain(id.ancestors())
                    .find_map(|candidate| rows.position(&candidate))
            })
            .unwrap_or(0);

        self.set_pos(pos, rows);
    }

    /// Move to `id` if it is visible. Returns true if the selection moved.
    pub fn select(&mut self, id: &NodeId, rows: &VisibleRows) -> bool {
        match rows.position(id) {
            Some(pos) => self.move_to(pos, rows),
            None => false,
        }
    }

    pub fn move_up(&mut self, rows: &VisibleRows) -> bool {
        match self.current(rows) {
            Some(pos) if pos > 0 => self.move_to(pos - 1, rows),
            _ => false,
        }
    }

    pub fn move_down(&mut self, rows: &VisibleRows) -> bool {
        match self.current(rows) {
            Some(pos) if pos + 1 < rows.len() => self.move_to(pos + 1, rows),
            _ => false,
        }
    }

    pub fn page_up(&mut self, rows: &VisibleRows) -> bool {
        match self.current(rows) {
            Some(pos) => self.move_to(pos.saturating_sub(self.height), rows),
            None => false,
        }
    }

    pub fn page_down(&mut self, rows: &VisibleRows) -> bool {
        match self.current(rows) {
            Some(pos) => {
                let last = rows.len().saturating_sub(1);
                self.move_to((pos + self.height).min(last), rows)
            }
            None => false,
        }
    }

    pub fn home(&mut self, rows: &VisibleRows) -> bool {
        match self.current(rows) {
            Some(_) => self.move_to(0, rows),
            None => false,
        }
    }

    pub fn end(&mut self, rows: &VisibleRows) -> bool {
        match self.current(rows) {
            Some(_) => self.move_to(rows.len() - 1, rows),
            None => false,
        }
    }

    /// Row range currently inside the viewport
    pub fn window(&self, rows: &VisibleRows) -> Range<usize> {
        let start = self.top.min(rows.len());
        let end = (self.top + self.height).min(rows.len());
        start..end
    }

    /// Position of the selection, resolving first if it never was
    fn current(&mut self, rows: &VisibleRows) -> Option<usize> {
        if rows.is_empty() {
            return None;
        }
        if self.selected.is_none() {
            self.resolve(rows);
        }
        Some(self.pos.min(rows.len() - 1))
    }

    fn move_to(&mut self, pos: usize, rows: &VisibleRows) -> bool {
        let changed = pos != self.pos;
        self.set_pos(pos, rows);
        changed
    }

    fn set_pos(&mut self, pos: usize, rows: &VisibleRows) {
        let Some(row) = rows.get(pos) else {
            return;
        };
        self.pos = pos;
        self.selected = Some(row.id.clone());
        self.scroll_into_view(rows.len());
    }

    /// Minimal scroll keeping `pos` in `[top, top + height)`, never past the end
    fn scroll_into_view(&mut self, len: usize) {
        self.top = self.top.min(len.saturating_sub(self.height));
        if self.pos < self.top {
            self.top = self.pos;
        } else if self.pos >= self.top + self.height {
            self.top = self.pos + 1 - self.height;
        }
    }
}
