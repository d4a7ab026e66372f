//! Tree Module - identity-keyed view over the stores
//!
//! ```text
//! Stores ──snapshot──► TreeBuilder ──► Tree ──flatten(ExpansionState)──► VisibleRows
//! ```
//!
//! A `Tree` is rebuilt from scratch on every tick and never mutated.
//! Everything the user controls (expansion, selection) is keyed by
//! `NodeId` and lives outside the tree.

mod builder;
mod flatten;
mod node;

pub use builder::{message_label, TreeBuilder};
pub use flatten::{flatten, ExpansionState, FlatRow, VisibleRows};
pub use node::{NodeId, NodeKind, Tree, TreeNode, MESSAGES, PARAMETERS};
