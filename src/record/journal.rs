//! JSON-lines expense journal
//!
//! Appends one JSON object per record. The format is deliberately dumb:
//! append-only, one line per expense, trivially greppable and easy to
//! import elsewhere.

use super::RecordSink;
use crate::error::RecordError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// One journal line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
}

/// Record sink appending to a JSON-lines file
pub struct JournalSink {
    path: PathBuf,
}

impl JournalSink {
    /// Create the sink, ensuring the journal's directory exists
    pub fn new(path: PathBuf) -> Result<Self, RecordError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl RecordSink for JournalSink {
    async fn add_record(&self, description: &str, amount: f64) -> Result<(), RecordError> {
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            description: description.to_string(),
            amount,
        };

        let line = serde_json::to_string(&entry)
            .map_err(|e| RecordError::Rejected(format!("serialization failed: {}", e)))?;

        // Writes are small and rare; a synchronous append keeps the
        // journal free of partial lines
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        tracing::info!("expense added: {:.2} for {}", amount, description);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "journal"
    }
}
