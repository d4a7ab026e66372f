//! RecordStore - latest value + arrival statistics per (source, record type)
//!
//! One lock around the whole table. Ingestion holds it for a single entry
//! update, snapshots hold it for the copy. Nothing else ever runs under it.

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;

use crate::types::{RecordValue, SourceKey};

/// Default exponential smoothing factor for the frequency estimate
pub const DEFAULT_SMOOTHING: f64 = 0.2;

/// Latest known state of one record type from one source
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry {
    pub type_name: String,
    pub value: RecordValue,
    /// Number of arrivals recorded so far
    pub count: u64,
    /// True while the entry only holds its first arrival
    pub first_arrival: bool,
    /// Smoothed arrival rate in Hz
    pub frequency: f64,
    /// Timestamp of the newest arrival, in seconds
    pub last_arrival: f64,
    /// Whether at least one positive interval has fed the estimate
    rate_seeded: bool,
}

impl RecordEntry {
    /// Entry with explicit statistics, for building snapshots by hand
    pub fn with_stats(
        type_name: impl Into<String>,
        value: RecordValue,
        count: u64,
        frequency: f64,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            value,
            count,
            first_arrival: count <= 1,
            frequency,
            last_arrival: 0.0,
            rate_seeded: frequency > 0.0,
        }
    }

    fn first(type_name: &str, value: RecordValue, timestamp: f64) -> Self {
        Self {
            type_name: type_name.to_string(),
            value,
            count: 1,
            first_arrival: true,
            frequency: 0.0,
            last_arrival: timestamp,
            rate_seeded: false,
        }
    }

    /// Fold one more arrival into the entry
    fn record_arrival(&mut self, value: RecordValue, timestamp: f64, alpha: f64) {
        let interval = timestamp - self.last_arrival;
        if interval > 0.0 {
            let rate = 1.0 / interval;
            self.frequency = if self.rate_seeded {
                alpha * rate + (1.0 - alpha) * self.frequency
            } else {
                rate
            };
            self.rate_seeded = true;
            self.last_arrival = timestamp;
        }

        self.count += 1;
        self.first_arrival = false;
        self.value = value;
    }
}

/// Thread-safe per-source record table
#[derive(Debug)]
pub struct RecordStore {
    entries: Mutex<HashMap<SourceKey, BTreeMap<String, RecordEntry>>>,
    alpha: f64,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING)
    }
}

impl RecordStore {
    /// Create a store with the given smoothing factor.
    ///
    /// Values outside (0, 1] fall back to [`DEFAULT_SMOOTHING`].
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha > 0.0 && alpha <= 1.0 {
            alpha
        } else {
            DEFAULT_SMOOTHING
        };
        Self {
            entries: Mutex::new(HashMap::new()),
            alpha,
        }
    }

    pub fn smoothing(&self) -> f64 {
        self.alpha
    }

    /// Record one arrival of `type_name` from `source`
    pub fn ingest(&self, source: SourceKey, type_name: &str, value: RecordValue, timestamp: f64) {
        let mut entries = self.entries.lock();
        let table = entries.entry(source).or_default();
        match table.get_mut(type_name) {
            Some(entry) => entry.record_arrival(value, timestamp, self.alpha),
            None => {
                table.insert(
                    type_name.to_string(),
                    RecordEntry::first(type_name, value, timestamp),
                );
            }
        }
    }

    /// Independent copy of every entry for `source`, ordered by type name
    pub fn snapshot(&self, source: SourceKey) -> Vec<RecordEntry> {
        self.entries
            .lock()
            .get(&source)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Copy of a single entry
    pub fn get(&self, source: SourceKey, type_name: &str) -> Option<RecordEntry> {
        self.entries
            .lock()
            .get(&source)
            .and_then(|table| table.get(type_name).cloned())
    }
}
