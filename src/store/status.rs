//! StatusLog - bounded ring of free-text status messages

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use crate::types::SourceKey;

/// Default number of messages kept
pub const DEFAULT_STATUS_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub received_at: DateTime<Local>,
    pub source: SourceKey,
    pub severity: Option<u8>,
    pub text: String,
}

impl StatusMessage {
    /// `[HH:MM:SS] [sys:comp] text`
    pub fn display_line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.received_at.format("%H:%M:%S"),
            self.source,
            self.text
        )
    }
}

/// Ring buffer of the most recent status messages from all sources
#[derive(Debug)]
pub struct StatusLog {
    messages: Mutex<VecDeque<StatusMessage>>,
    capacity: usize,
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_CAPACITY)
    }
}

impl StatusLog {
    /// Capacity is clamped to at least one message
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&self, source: SourceKey, severity: Option<u8>, text: impl Into<String>) {
        self.push_at(Local::now(), source, severity, text);
    }

    pub fn push_at(
        &self,
        received_at: DateTime<Local>,
        source: SourceKey,
        severity: Option<u8>,
        text: impl Into<String>,
    ) {
        let mut messages = self.messages.lock();
        messages.push_back(StatusMessage {
            received_at,
            source,
            severity,
            text: text.into(),
        });
        while messages.len() > self.capacity {
            messages.pop_front();
        }
    }

    /// The newest `n` messages, oldest first
    pub fn tail(&self, n: usize) -> Vec<StatusMessage> {
        let messages = self.messages.lock();
        let skip = messages.len().saturating_sub(n);
        messages.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_messages() {
        let log = StatusLog::new(3);
        let source = SourceKey::new(1, 1);
        for i in 0..5 {
            log.push(source, Some(6), format!("msg {}", i));
        }

        assert_eq!(log.len(), 3);
        let texts: Vec<_> = log.tail(10).into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn tail_returns_oldest_first() {
        let log = StatusLog::default();
        let source = SourceKey::new(1, 1);
        log.push(source, None, "a");
        log.push(source, None, "b");
        log.push(source, None, "c");

        let texts: Vec<_> = log.tail(2).into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let log = StatusLog::new(0);
        log.push(SourceKey::new(1, 1), None, "only");
        log.push(SourceKey::new(1, 1), None, "latest");
        assert_eq!(log.len(), 1);
        assert_eq!(log.tail(5)[0].text, "latest");
    }

    #[test]
    fn display_line_has_time_source_and_text() {
        let log = StatusLog::default();
        log.push(SourceKey::new(1, 1), Some(4), "PreArm: Compass not calibrated");
        let line = log.tail(1)[0].display_line();
        assert!(line.contains("[1:1] PreArm: Compass not calibrated"));
        assert!(line.starts_with('['));
    }
}
