//! TUI Module - live telemetry tree
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        UI LAYER (widgets/)                          │
//! │  Pure rendering of the session window, status log and footer.       │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ RenderRow window
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     SESSION (crate::session)                        │
//! │  Tree rebuilds, expansion, navigation. Commands from events.rs.     │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ Arc<Stores> snapshots
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   INGESTION (crate::source)                         │
//! │  TelemetrySource trait. JSON lines or the demo vehicle.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod theme;

pub mod widgets;

pub use app::TuiApp;
pub use events::{map_event, map_key};
pub use theme::InspectorTheme;
pub use widgets::Chrome;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::session::Session;

/// Run the interactive inspector until the user quits
pub async fn run(
    session: Session,
    chrome: Chrome,
    tick: Duration,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    TuiApp::new(session, chrome, tick, cancel).run().await
}
