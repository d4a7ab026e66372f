//! TreeBuilder - turns store snapshots into an identity-keyed tree
//!
//! Pure function of its inputs: the same snapshots always give the same
//! identities, labels and ordering.

use crate::store::{ParameterEntry, RecordEntry, Stores};
use crate::types::{RecordValue, SourceKey};

use super::node::{NodeId, NodeKind, Tree, TreeNode, MESSAGES, PARAMETERS};

/// Accumulates one subtree per source into a forest
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: Tree,
    sources: Vec<SourceKey>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree of a single source
    pub fn build(source: SourceKey, records: &[RecordEntry], params: &[ParameterEntry]) -> Tree {
        let mut builder = Self::new();
        builder.add_source(source, records, params);
        builder.finish()
    }

    /// Snapshot every known source and build the whole forest
    pub fn from_stores(stores: &Stores) -> Tree {
        let mut builder = Self::new();
        for source in stores.sources() {
            let records = stores.records.snapshot(source);
            let params = stores.params.snapshot(source);
            builder.add_source(source, &records, &params);
        }
        builder.finish()
    }

    /// Add the subtree of `source`
    pub fn add_source(
        &mut self,
        source: SourceKey,
        records: &[RecordEntry],
        params: &[ParameterEntry],
    ) -> &mut Self {
        let root = NodeId::root(source);

        let messages = self.add_messages(&root, records);
        let parameters = self.add_parameters(&root, params);

        self.insert(TreeNode {
            id: root.clone(),
            label: root.to_string(),
            children: vec![messages, parameters],
            expandable: true,
            kind: NodeKind::Source,
        });
        self.sources.push(source);
        self
    }

    pub fn finish(mut self) -> Tree {
        self.sources.sort();
        self.sources.dedup();
        self.tree.roots = self.sources.iter().map(|s| NodeId::root(*s)).collect();
        self.tree
    }

    fn add_messages(&mut self, root: &NodeId, records: &[RecordEntry]) -> NodeId {
        let category = root.child(MESSAGES);

        let mut sorted: Vec<&RecordEntry> = records.iter().collect();
        sorted.sort_by(|a, b| a.type_name.cmp(&b.type_name));

        let children: Vec<NodeId> = sorted
            .into_iter()
            .map(|entry| self.add_message(&category, entry))
            .collect();

        self.insert(category_node(category.clone(), MESSAGES, children));
        category
    }

    fn add_message(&mut self, category: &NodeId, entry: &RecordEntry) -> NodeId {
        let id = category.child(&entry.type_name);
        let stats = message_label(entry);

        let (label, children) = match &entry.value {
            RecordValue::Scalar(value) => (format!("{}: {}", stats, value), Vec::new()),
            RecordValue::Fields(fields) => {
                // A repeated field name keeps its first position and shows the last value
                let mut children: Vec<NodeId> = Vec::with_capacity(fields.len());
                for (name, value) in fields {
                    let child = id.child(name);
                    if !children.contains(&child) {
                        children.push(child.clone());
                    }
                    self.insert(TreeNode::leaf(
                        child,
                        format!("{}: {}", name, value),
                        NodeKind::Field,
                    ));
                }
                (stats, children)
            }
            RecordValue::MultiLineText(lines) => {
                let children = lines
                    .iter()
                    .enumerate()
                    .map(|(index, line)| {
                        let child = id.line(index);
                        self.insert(TreeNode::leaf(
                            child.clone(),
                            format!("{:03}: {}", index, line),
                            NodeKind::Line,
                        ));
                        child
                    })
                    .collect();
                (stats, children)
            }
        };

        self.insert(TreeNode {
            id: id.clone(),
            label,
            expandable: !children.is_empty(),
            children,
            kind: NodeKind::Message,
        });
        id
    }

    fn add_parameters(&mut self, root: &NodeId, params: &[ParameterEntry]) -> NodeId {
        let category = root.child(PARAMETERS);

        let mut sorted: Vec<&ParameterEntry> = params.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let children: Vec<NodeId> = sorted
            .into_iter()
            .map(|param| {
                let id = category.child(&param.name);
                self.insert(TreeNode::leaf(
                    id.clone(),
                    format!("{}: {}", param.name, param.value),
                    NodeKind::Parameter,
                ));
                id
            })
            .collect();

        self.insert(category_node(category.clone(), PARAMETERS, children));
        category
    }

    fn insert(&mut self, node: TreeNode) {
        self.tree.nodes.insert(node.id.clone(), node);
    }
}

fn category_node(id: NodeId, label: &str, children: Vec<NodeId>) -> TreeNode {
    TreeNode {
        id,
        label: label.to_string(),
        expandable: !children.is_empty(),
        children,
        kind: NodeKind::Category,
    }
}

/// `"{type} [{freq:.1} Hz, {count} msgs]"`
pub fn message_label(entry: &RecordEntry) -> String {
    format!(
        "{} [{:.1} Hz, {} msgs]",
        entry.type_name, entry.frequency, entry.count
    )
}
