//! Record-add capability
//!
//! The pipeline hands parsed expenses to a [`RecordSink`]; what happens
//! to them after that is the sink's business. The built-in sinks are a
//! JSON-lines journal file and a log-only sink for when the journal is
//! disabled.

pub mod journal;

use crate::config::JournalConfig;
use crate::error::RecordError;
use async_trait::async_trait;

/// Trait for record-add implementations
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persist one expense record
    async fn add_record(&self, description: &str, amount: f64) -> Result<(), RecordError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Sink that only logs the record; used when the journal is disabled
pub struct LogSink;

#[async_trait]
impl RecordSink for LogSink {
    async fn add_record(&self, description: &str, amount: f64) -> Result<(), RecordError> {
        tracing::info!("expense (journal disabled): {:.2} for {}", amount, description);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Factory function to create the configured record sink
pub fn create_sink(config: &JournalConfig) -> crate::error::Result<Box<dyn RecordSink>> {
    match config.resolve_path() {
        Some(path) => {
            tracing::info!("journal: {:?}", path);
            Ok(Box::new(journal::JournalSink::new(path)?))
        }
        None => {
            tracing::info!("journal disabled, records will only be logged");
            Ok(Box::new(LogSink))
        }
    }
}
