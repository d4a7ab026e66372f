//! Store Module - shared telemetry state
//!
//! The only state touched by both the ingestion task and the UI loop.
//! Each table sits behind its own lock; readers take independent copies.
//!
//! Key types:
//! - `RecordStore`: latest value + arrival statistics per record type
//! - `ParameterStore`: latest value per named parameter
//! - `StatusLog`: bounded ring of status text messages
//! - `Stores`: the bundle handed to both sides as `Arc<Stores>`

mod params;
mod records;
mod status;

use std::collections::BTreeSet;

use parking_lot::Mutex;
use tracing::trace;

pub use params::{ParameterEntry, ParameterStore};
pub use records::{RecordEntry, RecordStore, DEFAULT_SMOOTHING};
pub use status::{StatusLog, StatusMessage, DEFAULT_STATUS_CAPACITY};

use crate::types::{SourceKey, TelemetryEvent};

/// All telemetry stores plus the set of sources seen so far
#[derive(Debug, Default)]
pub struct Stores {
    pub records: RecordStore,
    pub params: ParameterStore,
    pub status: StatusLog,
    known: Mutex<BTreeSet<SourceKey>>,
}

impl Stores {
    pub fn new(smoothing: f64, status_capacity: usize) -> Self {
        Self {
            records: RecordStore::new(smoothing),
            params: ParameterStore::new(),
            status: StatusLog::new(status_capacity),
            known: Mutex::new(BTreeSet::new()),
        }
    }

    /// Route one decoded event to its store
    pub fn apply(&self, event: TelemetryEvent) {
        trace!(event = %event.description(), "ingest");
        self.known.lock().insert(event.source());

        match event {
            TelemetryEvent::Record {
                source,
                type_name,
                value,
                timestamp,
            } => self.records.ingest(source, &type_name, value, timestamp),
            TelemetryEvent::Parameter {
                source,
                name,
                value,
            } => self.params.ingest(source, &name, value),
            TelemetryEvent::StatusText {
                source,
                severity,
                text,
            } => self.status.push(source, severity, text),
        }
    }

    /// Every source that has sent anything, in tree order
    pub fn sources(&self) -> Vec<SourceKey> {
        self.known.lock().iter().copied().collect()
    }
}
