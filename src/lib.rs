//! mavinspect - live collapsible tree of decoded MAVLink telemetry

pub mod config;
pub mod error;
pub mod nav;
pub mod session;
pub mod source;
pub mod store;
pub mod tree;
pub mod tui;
pub mod types;

pub use config::InspectorConfig;
pub use error::{FixSuggestion, InspectorError};
pub use nav::NavigationController;
pub use session::{Command, Flow, RenderRow, Session};
pub use source::{JsonLinesSource, TelemetrySource};
pub use store::Stores;
pub use tree::{flatten, ExpansionState, NodeId, Tree, TreeBuilder};
pub use types::{Primitive, RecordValue, SourceKey, TelemetryEvent};
