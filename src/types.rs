//! Telemetry value types
//!
//! Everything the ingestion side hands to the stores is already classified
//! by the decoder. Nothing in here looks at the shape of a value to decide
//! what it is.

use std::fmt;

// ============================================================================
// SOURCE KEY
// ============================================================================

/// Identifies one telemetry-emitting peer: (system id, component id)
///
/// Ordered by system first, then component, which is the order sources
/// appear in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceKey {
    pub system: u8,
    pub component: u8,
}

impl SourceKey {
    pub fn new(system: u8, component: u8) -> Self {
        Self { system, component }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.system, self.component)
    }
}

// ============================================================================
// PRIMITIVE
// ============================================================================

/// A single decoded scalar
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Primitive {
    /// Convert an arbitrary JSON value into a primitive.
    ///
    /// Nested values (arrays, objects) and null are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{:.4}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Primitive {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// RECORD VALUE
// ============================================================================

/// Latest value of one record type, as classified by the decoder
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Scalar(Primitive),
    MultiLineText(Vec<String>),
    /// Field order is the decoder's order and is never re-sorted
    Fields(Vec<(String, Primitive)>),
}

impl RecordValue {
    /// Value for a record the decoder could not classify
    pub fn unclassified() -> Self {
        Self::Fields(Vec::new())
    }

    /// Split a block of text into lines, dropping a single trailing empty line
    pub fn text(block: &str) -> Self {
        let mut lines: Vec<String> = block.split('\n').map(str::to_string).collect();
        if lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        Self::MultiLineText(lines)
    }

    /// Build a `Fields` value from (name, value) pairs in order
    pub fn fields<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Primitive>,
    {
        Self::Fields(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Verbose text form: one `"{field}: {value}"` line per field.
    ///
    /// Scalars and text are returned unchanged.
    pub fn into_verbose(self) -> Self {
        match self {
            Self::Fields(fields) => Self::MultiLineText(
                fields
                    .into_iter()
                    .map(|(name, value)| format!("{}: {}", name, value))
                    .collect(),
            ),
            other => other,
        }
    }
}

// ============================================================================
// TELEMETRY EVENT
// ============================================================================

/// One decoded arrival handed to the stores
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    Record {
        source: SourceKey,
        type_name: String,
        value: RecordValue,
        /// Arrival time in seconds on the source's clock
        timestamp: f64,
    },
    Parameter {
        source: SourceKey,
        name: String,
        value: Primitive,
    },
    StatusText {
        source: SourceKey,
        severity: Option<u8>,
        text: String,
    },
}

impl TelemetryEvent {
    pub fn source(&self) -> SourceKey {
        match self {
            Self::Record { source, .. }
            | Self::Parameter { source, .. }
            | Self::StatusText { source, .. } => *source,
        }
    }

    /// Short description for debug logging
    pub fn description(&self) -> String {
        match self {
            Self::Record {
                source, type_name, ..
            } => format!("{} record {}", source, type_name),
            Self::Parameter { source, name, .. } => format!("{} param {}", source, name),
            Self::StatusText { source, .. } => format!("{} status text", source),
        }
    }
}
