//! Warning/error reporting sink
//!
//! The pipeline surfaces recoverable failures (bad parses, rejected
//! records, engine errors) through a small reporting trait so the
//! presentation layer decides what the user actually sees. The daemon
//! uses the tracing-backed reporter; tests use the in-memory one.

/// What kind of failure is being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// The utterance could not be parsed into an expense
    Parse,
    /// The speech engine ended the turn with an error
    Session,
    /// The record-add collaborator rejected the expense
    Record,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Parse => "parse",
            ReportKind::Session => "session",
            ReportKind::Record => "record",
        }
    }
}

/// Trait for warning/error sinks
pub trait Reporter: Send + Sync {
    fn report(&self, kind: ReportKind, message: &str);
}

/// Reporter that forwards to the tracing subscriber
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, kind: ReportKind, message: &str) {
        match kind {
            ReportKind::Parse => tracing::warn!("[{}] {}", kind.as_str(), message),
            ReportKind::Session | ReportKind::Record => {
                tracing::error!("[{}] {}", kind.as_str(), message)
            }
        }
    }
}

/// Reporter that collects reports for assertions in tests
#[derive(Default)]
pub struct MemoryReporter {
    reports: std::sync::Mutex<Vec<(ReportKind, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything reported so far
    pub fn take(&self) -> Vec<(ReportKind, String)> {
        std::mem::take(&mut *self.reports.lock().expect("reporter lock poisoned"))
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, kind: ReportKind, message: &str) {
        self.reports
            .lock()
            .expect("reporter lock poisoned")
            .push((kind, message.to_string()));
    }
}
