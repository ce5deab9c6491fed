//! Transition log: append-only line-delimited JSON of funnel activity.
//!
//! Each line is a self-contained JSON object, assembled in memory and
//! written atomically via `write_all` so a tailing process never sees a
//! partial line. Logging must never break the funnel itself, so the writer
//! degrades instead of failing:
//!
//! 1. Primary file path
//! 2. stderr with a `[QF-LOG]` prefix
//! 3. Silent discard
//!
//! A bounded in-memory ring of recent records is kept regardless of the
//! writer state, so a diagnostics view works even when the disk does not.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::LogConfig;
use crate::funnel::model::Screen;

/// Event types matching the funnel activity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ScreenChange,
    RequestIssued,
    ResponseApplied,
    ResponseDiscarded,
    Notice,
    Handoff,
    Error,
}

/// A single transition record, one JSONL line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Screen before the transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_screen: Option<Screen>,
    /// Screen after the transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_screen: Option<Screen>,
    /// Request token, for issued/applied/discarded events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<u64>,
    /// Whether the underlying operation succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    /// Stable error code if the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl TransitionRecord {
    /// Create a new record stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            from_screen: None,
            to_screen: None,
            token: None,
            ok: None,
            error_code: None,
            details: None,
        }
    }

    /// Attach the before/after screens.
    #[must_use]
    pub const fn screens(mut self, from: Screen, to: Screen) -> Self {
        self.from_screen = Some(from);
        self.to_screen = Some(to);
        self
    }

    /// Attach the request token.
    #[must_use]
    pub const fn token(mut self, token: u64) -> Self {
        self.token = Some(token);
        self
    }

    /// Attach the success flag.
    #[must_use]
    pub const fn ok(mut self, ok: bool) -> Self {
        self.ok = Some(ok);
        self
    }

    /// Attach the stable error code.
    #[must_use]
    pub fn error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Attach freeform details.
    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Stderr,
    Discard,
}

/// Append-only transition log with a bounded in-memory ring.
pub struct TransitionLog {
    writer: Option<BufWriter<File>>,
    state: WriterState,
    recent: VecDeque<TransitionRecord>,
    recent_capacity: usize,
}

impl TransitionLog {
    /// Open the log file, degrading to stderr if the path is unwritable.
    #[must_use]
    pub fn open(path: &Path, config: &LogConfig) -> Self {
        let (writer, state) = match open_append(path) {
            Ok(file) => (
                Some(BufWriter::with_capacity(16 * 1024, file)),
                WriterState::Normal,
            ),
            Err(_) => {
                let _ = writeln!(
                    io::stderr(),
                    "[QF-LOG] log path unwritable, using stderr: {}",
                    path.display()
                );
                (None, WriterState::Stderr)
            }
        };
        Self {
            writer,
            state,
            recent: VecDeque::with_capacity(config.recent_capacity),
            recent_capacity: config.recent_capacity,
        }
    }

    /// A log that keeps the in-memory ring but writes nowhere.
    #[must_use]
    pub fn discard(config: &LogConfig) -> Self {
        Self {
            writer: None,
            state: WriterState::Discard,
            recent: VecDeque::with_capacity(config.recent_capacity),
            recent_capacity: config.recent_capacity,
        }
    }

    /// Record one transition: ring first, then one JSONL line.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.recent_capacity > 0 {
            if self.recent.len() == self.recent_capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(record.clone());
        }

        let line = match serde_json::to_string(&record) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[QF-LOG] serialize error: {e}");
                return;
            }
        };
        self.write_line(&line);
    }

    /// Flush buffered lines.
    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    /// Most recent records, oldest first.
    #[must_use]
    pub fn recent(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.recent.iter()
    }

    /// Current degradation state.
    #[must_use]
    pub const fn state(&self) -> &'static str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    // ──────────────────── internals ────────────────────

    fn write_line(&mut self, line: &str) {
        match self.state {
            WriterState::Normal => {
                if let Some(w) = self.writer.as_mut() {
                    if w.write_all(line.as_bytes()).is_ok() {
                        return;
                    }
                }
                self.writer = None;
                self.state = WriterState::Stderr;
                let _ = writeln!(io::stderr(), "[QF-LOG] write failed, using stderr");
                let _ = write!(io::stderr(), "[QF-LOG] {line}");
            }
            WriterState::Stderr => {
                let _ = write!(io::stderr(), "[QF-LOG] {line}");
            }
            WriterState::Discard => {}
        }
    }
}

/// Open or create a file for appending.
fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Format current UTC time as ISO 8601.
fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn log_config(capacity: usize) -> LogConfig {
        LogConfig {
            recent_capacity: capacity,
        }
    }

    #[test]
    fn record_produces_valid_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transitions.jsonl");
        let mut log = TransitionLog::open(&path, &log_config(8));

        log.record(
            TransitionRecord::new(EventType::ScreenChange)
                .screens(Screen::Entry, Screen::Language),
        );
        log.flush();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["event"], "screen_change");
        assert!(parsed["ts"].is_string());
    }

    #[test]
    fn optional_fields_omitted_when_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sparse.jsonl");
        let mut log = TransitionLog::open(&path, &log_config(8));

        log.record(TransitionRecord::new(EventType::Notice));
        log.flush();

        let line = fs::read_to_string(&path).unwrap();
        assert!(!line.contains("\"token\""));
        assert!(!line.contains("\"ok\""));
        assert!(!line.contains("\"error_code\""));
    }

    #[test]
    fn multiple_records_are_separate_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multi.jsonl");
        let mut log = TransitionLog::open(&path, &log_config(8));

        for token in 0..5 {
            log.record(TransitionRecord::new(EventType::RequestIssued).token(token));
        }
        log.flush();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 5);
        for line in contents.lines() {
            let _: serde_json::Value = serde_json::from_str(line).unwrap();
        }
    }

    #[test]
    fn unwritable_path_degrades_without_failing() {
        let dir = tempfile::tempdir().unwrap();
        // Parent is a regular file, so it can never become a directory.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let path = blocker.join("t.jsonl");

        let mut log = TransitionLog::open(&path, &log_config(8));
        assert_eq!(log.state(), "stderr");
        // Must not panic.
        log.record(TransitionRecord::new(EventType::Error).ok(false));
    }

    #[test]
    fn ring_is_bounded_and_keeps_newest() {
        let mut log = TransitionLog::discard(&log_config(3));
        for token in 0..10 {
            log.record(TransitionRecord::new(EventType::RequestIssued).token(token));
        }
        let tokens: Vec<u64> = log.recent().filter_map(|r| r.token).collect();
        assert_eq!(tokens, vec![7, 8, 9]);
    }

    #[test]
    fn zero_capacity_ring_keeps_nothing() {
        let mut log = TransitionLog::discard(&log_config(0));
        log.record(TransitionRecord::new(EventType::Notice));
        assert_eq!(log.recent().count(), 0);
    }
}
