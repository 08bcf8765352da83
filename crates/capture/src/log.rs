// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Event log implementation.

use crate::event::{CapturedEvent, EventDetail, EventKind};
use parking_lot::Mutex;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Shared log of reporter events.
///
/// Clones share the same storage, so a reporter can record into one handle
/// while the caller keeps another for inspection.
pub struct EventLog {
    start: Instant,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl EventLog {
    /// Create a new in-memory event log
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            events: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
        }
    }

    /// Create an event log that also writes every event to a file (JSONL format)
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            start: Instant::now(),
            events: Arc::new(Mutex::new(Vec::new())),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
        })
    }

    /// Record an event
    pub fn record(&self, kind: EventKind, at_ms: u64, detail: EventDetail) {
        let mut events = self.events.lock();
        let event = CapturedEvent {
            seq: events.len() as u64,
            elapsed: self.start.elapsed(),
            at_ms,
            kind,
            detail,
        };

        events.push(event.clone());

        if let Some(ref writer) = self.file_writer {
            use std::io::Write;
            let mut w = writer.lock();
            if let Ok(json) = serde_json::to_string(&event) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }
    }

    /// Get all captured events
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    /// Get the last N events
    pub fn last(&self, n: usize) -> Vec<CapturedEvent> {
        let all = self.events.lock();
        all.iter().rev().take(n).rev().cloned().collect()
    }

    /// Count events matching a predicate
    pub fn count<F: Fn(&CapturedEvent) -> bool>(&self, pred: F) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }

    /// Count events of one kind
    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.count(|e| e.kind == kind)
    }

    /// Titles of the events of one kind, in emission order
    pub fn titles(&self, kind: EventKind) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .filter_map(|e| e.detail.title.clone())
            .collect()
    }

    /// Messages of the events of one kind, in emission order
    pub fn messages(&self, kind: EventKind) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .filter_map(|e| e.detail.message.clone())
            .collect()
    }

    /// Kinds of all events, in emission order
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(|e| e.kind).collect()
    }

    /// Get the total number of events
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Clear all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventLog {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            events: Arc::clone(&self.events),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
