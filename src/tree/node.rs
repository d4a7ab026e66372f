//! Node identities and the immutable node table

use std::collections::HashMap;
use std::fmt;

use crate::types::SourceKey;

/// Label and path segment of the record category
pub const MESSAGES: &str = "Messages";
/// Label and path segment of the parameter category
pub const PARAMETERS: &str = "Parameters";

const SEPARATOR: char = '/';

// ============================================================================
// NODE ID
// ============================================================================

/// Path-derived node identity
///
/// Segments are joined with `/`; a `/` or `%` inside a segment is
/// percent-escaped, so stripping the last segment always yields the parent.
/// The same logical position produces the same id on every rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Identity of a source's root node: `"{system}:{component}"`
    pub fn root(source: SourceKey) -> Self {
        Self(source.to_string())
    }

    /// Identity of the child named `segment`
    pub fn child(&self, segment: &str) -> Self {
        let mut id = String::with_capacity(self.0.len() + segment.len() + 1);
        id.push_str(&self.0);
        id.push(SEPARATOR);
        for c in segment.chars() {
            match c {
                '%' => id.push_str("%25"),
                '/' => id.push_str("%2F"),
                c => id.push(c),
            }
        }
        Self(id)
    }

    /// Identity of the `index`-th line of a text record
    pub fn line(&self, index: usize) -> Self {
        self.child(&format!("{:03}", index))
    }

    /// Parent identity, `None` for a root
    pub fn parent(&self) -> Option<NodeId> {
        self.0
            .rsplit_once(SEPARATOR)
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// Ancestors from the direct parent up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = NodeId> {
        std::iter::successors(self.parent(), NodeId::parent)
    }

    pub fn is_root(&self) -> bool {
        !self.0.contains(SEPARATOR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// TREE NODE
// ============================================================================

/// What a node stands for; only used for display styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Source,
    Category,
    Message,
    Field,
    Line,
    Parameter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: NodeId,
    pub label: String,
    pub children: Vec<NodeId>,
    pub expandable: bool,
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn leaf(id: NodeId, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            label: label.into(),
            children: Vec::new(),
            expandable: false,
            kind,
        }
    }
}

// ============================================================================
// TREE
// ============================================================================

/// Immutable forest: one root per source plus a node table keyed by identity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    pub(crate) roots: Vec<NodeId>,
    pub(crate) nodes: HashMap<NodeId, TreeNode>,
}

impl Tree {
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: &NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether `id` exists and has children that can be shown
    pub fn is_expandable(&self, id: &NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.expandable)
    }

    /// Every expandable node below the roots
    pub fn expandable_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes
            .values()
            .filter(|n| n.expandable && !n.id.is_root())
            .map(|n| &n.id)
    }

    /// Total node count, hidden nodes included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_follow_the_path() {
        let root = NodeId::root(SourceKey::new(1, 1));
        let msg = root.child(MESSAGES).child("HEARTBEAT");
        assert_eq!(msg.as_str(), "1:1/Messages/HEARTBEAT");
        assert_eq!(msg.line(2).as_str(), "1:1/Messages/HEARTBEAT/002");
        assert_eq!(msg.ancestors().count(), 2);
        assert!(root.is_root());
        assert!(!msg.is_root());
    }

    #[test]
    fn parent_strips_last_segment() {
        let root = NodeId::root(SourceKey::new(3, 1));
        let field = root.child(MESSAGES).child("ATTITUDE").child("roll");

        let chain: Vec<String> = field.ancestors().map(|a| a.to_string()).collect();
        assert_eq!(chain, vec!["3:1/Messages/ATTITUDE", "3:1/Messages", "3:1"]);
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn separators_inside_names_are_escaped() {
        let category = NodeId::root(SourceKey::new(1, 1)).child(PARAMETERS);
        let param = category.child("A/B%C");
        assert_eq!(param.as_str(), "1:1/Parameters/A%2FB%25C");
        assert_eq!(param.parent(), Some(category));
    }
}
