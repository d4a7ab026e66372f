//! ParameterStore - flat name → value table per source

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;

use crate::types::{Primitive, SourceKey};

/// Latest value of one named parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEntry {
    pub name: String,
    pub value: Primitive,
}

impl ParameterEntry {
    pub fn new(name: impl Into<String>, value: impl Into<Primitive>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Thread-safe parameter table, overwrite semantics
#[derive(Debug, Default)]
pub struct ParameterStore {
    params: Mutex<HashMap<SourceKey, BTreeMap<String, Primitive>>>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name` for `source`
    pub fn ingest(&self, source: SourceKey, name: &str, value: Primitive) {
        self.params
            .lock()
            .entry(source)
            .or_default()
            .insert(name.to_string(), value);
    }

    /// Copy of every parameter for `source`, ordered by name
    pub fn snapshot(&self, source: SourceKey) -> Vec<ParameterEntry> {
        self.params
            .lock()
            .get(&source)
            .map(|table| {
                table
                    .iter()
                    .map(|(name, value)| ParameterEntry {
                        name: name.clone(),
                        value: value.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, source: SourceKey, name: &str) -> Option<Primitive> {
        self.params
            .lock()
            .get(&source)
            .and_then(|table| table.get(name).cloned())
    }
}
