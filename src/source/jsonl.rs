//! JSON-lines source: the output contract of an external decoder
//!
//! One object per line, tagged by `kind`:
//!
//! ```text
//! {"kind":"record","system":1,"component":1,"type":"HEARTBEAT","timestamp":12.5,
//!  "value":{"fields":{"type":2,"autopilot":3}}}
//! {"kind":"param","system":1,"component":1,"name":"SYSID_THISMAV","value":1}
//! {"kind":"status","system":1,"component":1,"severity":6,"text":"EKF3 IMU0 is using GPS"}
//! ```

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use async_trait::async_trait;
use futures::{future, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::wrappers::{LinesStream, ReceiverStream};
use tokio_stream::Stream;
use tracing::{info, warn};

use super::{EventStream, TelemetrySource};
use crate::error::{InspectorError, Result};
use crate::types::{Primitive, RecordValue, SourceKey, TelemetryEvent};

/// Reads decoded telemetry from a file, or stdin for `-`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonLinesSource {
    path: Option<PathBuf>,
}

impl JsonLinesSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn stdin() -> Self {
        Self { path: None }
    }

    /// `-` means stdin, anything else is a path
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::stdin()
        } else {
            Self::file(arg)
        }
    }
}

#[async_trait]
impl TelemetrySource for JsonLinesSource {
    fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "stdin".to_string(),
        }
    }

    async fn open(&self) -> Result<EventStream> {
        let events = match &self.path {
            Some(path) => {
                let file = tokio::fs::File::open(path).await?;
                events_from_lines(LinesStream::new(BufReader::new(file).lines()))
            }
            None => events_from_lines(lines_on_thread(io::stdin())?),
        };
        info!(input = %self.describe(), "opened JSON-lines input");
        Ok(events)
    }
}

/// Lines of a blocking reader, read on a plain OS thread.
///
/// Runtime shutdown does not wait on a pending read. After the stream is
/// dropped the thread exits at its next line, or with the process.
pub(crate) fn lines_on_thread<R>(reader: R) -> io::Result<ReceiverStream<io::Result<String>>>
where
    R: io::Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    thread::Builder::new()
        .name("mavinspect-input".into())
        .spawn(move || {
            for line in io::BufReader::new(reader).lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(ReceiverStream::new(rx))
}

const LINE_BUFFER: usize = 256;

/// Parse every line, skipping the ones that do not decode
pub(crate) fn events_from_lines<S>(lines: S) -> EventStream
where
    S: Stream<Item = io::Result<String>> + Send + 'static,
{
    let opened = Instant::now();
    let lines = lines
        .take_while(|line| {
            if let Err(e) = line {
                warn!(error = %e, "input read failed, stopping");
            }
            future::ready(line.is_ok())
        })
        .filter_map(|line| future::ready(line.ok()))
        .enumerate()
        .filter_map(move |(index, line)| {
            let elapsed = opened.elapsed().as_secs_f64();
            let event = match parse_line(&line, index + 1, elapsed) {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "skipping malformed input line");
                    None
                }
            };
            future::ready(event)
        });
    Box::pin(lines)
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum WireEvent {
    Record {
        system: u8,
        component: u8,
        #[serde(rename = "type")]
        type_name: String,
        timestamp: Option<f64>,
        #[serde(default)]
        value: Value,
    },
    Param {
        system: u8,
        component: u8,
        name: String,
        value: Value,
    },
    Status {
        system: u8,
        component: u8,
        severity: Option<u8>,
        text: String,
    },
}

/// Decode one input line.
///
/// Blank lines give `Ok(None)`. `elapsed` stands in for a missing record
/// timestamp.
pub fn parse_line(line: &str, line_no: usize, elapsed: f64) -> Result<Option<TelemetryEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let wire: WireEvent = serde_json::from_str(line).map_err(|e| InspectorError::Input {
        line: line_no,
        reason: e.to_string(),
    })?;

    let event = match wire {
        WireEvent::Record {
            system,
            component,
            type_name,
            timestamp,
            value,
        } => TelemetryEvent::Record {
            source: SourceKey::new(system, component),
            type_name,
            value: classify(&value),
            timestamp: timestamp.unwrap_or(elapsed),
        },
        WireEvent::Param {
            system,
            component,
            name,
            value,
        } => TelemetryEvent::Parameter {
            source: SourceKey::new(system, component),
            name,
            value: Primitive::from_json(&value),
        },
        WireEvent::Status {
            system,
            component,
            severity,
            text,
        } => TelemetryEvent::StatusText {
            source: SourceKey::new(system, component),
            severity,
            text,
        },
    };
    Ok(Some(event))
}

/// Map the decoder's value tag onto [`RecordValue`]; anything else is unclassified
fn classify(value: &Value) -> RecordValue {
    let Some(tagged) = value.as_object() else {
        return RecordValue::unclassified();
    };

    if let Some(scalar) = tagged.get("scalar") {
        return RecordValue::Scalar(Primitive::from_json(scalar));
    }

    match tagged.get("text") {
        Some(Value::String(block)) => return RecordValue::text(block),
        Some(Value::Array(lines)) => {
            return RecordValue::MultiLineText(
                lines
                    .iter()
                    .map(|line| match line {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )
        }
        _ => {}
    }

    match tagged.get("fields") {
        Some(Value::Object(fields)) => RecordValue::Fields(
            fields
                .iter()
                .map(|(name, v)| (name.clone(), Primitive::from_json(v)))
                .collect(),
        ),
        _ => RecordValue::unclassified(),
    }
}
