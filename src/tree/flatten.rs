//! ExpansionState + flatten
//!
//! Expansion is a set of identities, not a flag on nodes, so it survives
//! every rebuild untouched. Ids that vanish from the tree simply sit in
//! the set until they come back.

use std::collections::{HashMap, HashSet};

use super::node::{NodeId, Tree};

// ============================================================================
// EXPANSION STATE
// ============================================================================

/// Identities the user has expanded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<NodeId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw membership, regardless of whether the node is expandable
    pub fn contains(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    /// Whether `id` currently shows its children in `tree`.
    ///
    /// Roots are always open.
    pub fn is_open(&self, tree: &Tree, id: &NodeId) -> bool {
        id.is_root() || (tree.is_expandable(id) && self.expanded.contains(id))
    }

    /// Expand `id`; returns false when it was not expandable or already open
    pub fn expand(&mut self, tree: &Tree, id: &NodeId) -> bool {
        if id.is_root() || !tree.is_expandable(id) {
            return false;
        }
        self.expanded.insert(id.clone())
    }

    /// Collapse `id`; returns whether it was expanded
    pub fn collapse(&mut self, id: &NodeId) -> bool {
        self.expanded.remove(id)
    }

    /// Flip `id`; returns whether anything changed
    pub fn toggle(&mut self, tree: &Tree, id: &NodeId) -> bool {
        if self.is_open(tree, id) {
            self.collapse(id)
        } else {
            self.expand(tree, id)
        }
    }

    /// Expand every expandable node of the current tree
    pub fn expand_all(&mut self, tree: &Tree) {
        self.expanded.extend(tree.expandable_ids().cloned());
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

// ============================================================================
// VISIBLE ROWS
// ============================================================================

/// One visible row: which node, how deep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    pub id: NodeId,
    pub depth: usize,
}

/// Flattened visible sequence with an identity → position index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleRows {
    rows: Vec<FlatRow>,
    index: HashMap<NodeId, usize>,
}

impl VisibleRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&FlatRow> {
        self.rows.get(pos)
    }

    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlatRow> {
        self.rows.iter()
    }

    fn push(&mut self, id: &NodeId, depth: usize) {
        self.index.insert(id.clone(), self.rows.len());
        self.rows.push(FlatRow {
            id: id.clone(),
            depth,
        });
    }
}

/// Pre-order walk of `tree`, descending only into open nodes
pub fn flatten(tree: &Tree, expansion: &ExpansionState) -> VisibleRows {
    let mut rows = VisibleRows::default();
    for root in tree.roots() {
        emit(tree, expansion, root, 0, &mut rows);
    }
    rows
}

fn emit(tree: &Tree, expansion: &ExpansionState, id: &NodeId, depth: usize, out: &mut VisibleRows) {
    let Some(node) = tree.get(id) else {
        return;
    };
    out.push(id, depth);
    if expansion.is_open(tree, id) {
        for child in &node.children {
            emit(tree, expansion, child, depth + 1, out);
        }
    }
}
