//! Telemetry Sources - ingestion side
//!
//! A source turns some transport into a stream of already decoded
//! [`TelemetryEvent`]s. The ingestion task drains that stream into the
//! shared stores until the stream ends or the session is cancelled.

mod demo;
mod jsonl;

pub use demo::{demo_events, DemoSource};
pub use jsonl::{parse_line, JsonLinesSource};

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::Result;
use crate::store::Stores;
use crate::types::TelemetryEvent;

pub type EventStream = Pin<Box<dyn Stream<Item = TelemetryEvent> + Send>>;

// ─────────────────────────────────────────────────────────────────────────────
// Source Trait
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Human readable origin, shown in logs and the header
    fn describe(&self) -> String;

    /// Open the transport and start yielding events
    async fn open(&self) -> Result<EventStream>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Ingestion
// ─────────────────────────────────────────────────────────────────────────────

/// Run [`ingest`] on its own task
pub fn spawn_ingestion(
    events: EventStream,
    stores: Arc<Stores>,
    cancel: CancellationToken,
    details: bool,
) -> JoinHandle<u64> {
    tokio::spawn(async move { ingest(events, &stores, &cancel, details).await })
}

/// Apply events to `stores` until the stream ends or `cancel` fires.
///
/// Returns how many events were applied. Nothing in flight is flushed on
/// cancellation.
pub async fn ingest(
    mut events: EventStream,
    stores: &Stores,
    cancel: &CancellationToken,
    details: bool,
) -> u64 {
    let mut applied = 0u64;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(applied, "ingestion cancelled");
                break;
            }
            next = events.next() => match next {
                Some(event) => {
                    stores.apply(prepare(event, details));
                    applied += 1;
                }
                None => {
                    info!(applied, "input exhausted");
                    break;
                }
            }
        }
    }
    applied
}

/// `--details` renders every field list as text lines
fn prepare(event: TelemetryEvent, details: bool) -> TelemetryEvent {
    match event {
        TelemetryEvent::Record {
            source,
            type_name,
            value,
            timestamp,
        } if details => TelemetryEvent::Record {
            source,
            type_name,
            value: value.into_verbose(),
            timestamp,
        },
        other => other,
    }
}
