//! Command pipeline
//!
//! Receives finalized utterances from the speech session, parses them,
//! and hands successful commands to the record-add capability. Failures
//! go to the report sink and never terminate the pipeline; the user
//! retries by starting a new capture turn.

use crate::parse::{ParsedCommand, TranscriptParser};
use crate::record::RecordSink;
use crate::report::{ReportKind, Reporter};
use std::sync::Arc;

/// Orchestrates parse → add-record for one utterance at a time
pub struct CommandPipeline {
    parser: TranscriptParser,
    sink: Arc<dyn RecordSink>,
    reporter: Arc<dyn Reporter>,
    // Re-entrancy guard: the event loop is single-threaded, so a plain
    // flag is enough to drop utterances that arrive mid-cycle
    in_flight: bool,
}

impl CommandPipeline {
    pub fn new(
        parser: TranscriptParser,
        sink: Arc<dyn RecordSink>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            parser,
            sink,
            reporter,
            in_flight: false,
        }
    }

    /// Whether a parse/add cycle is currently in flight
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Process one finalized utterance
    ///
    /// Returns the parsed command when it was successfully recorded.
    /// An utterance arriving while a previous cycle is still in flight
    /// is dropped with a warning.
    pub async fn handle_transcript(&mut self, utterance: &str) -> Option<ParsedCommand> {
        if self.in_flight {
            tracing::warn!(
                "dropping utterance {:?}: previous command still processing",
                utterance
            );
            return None;
        }

        self.in_flight = true;
        let outcome = self.process(utterance).await;
        self.in_flight = false;
        outcome
    }

    async fn process(&self, utterance: &str) -> Option<ParsedCommand> {
        let command = match self.parser.parse(utterance) {
            Ok(command) => command,
            Err(e) => {
                self.reporter.report(
                    ReportKind::Parse,
                    &format!("could not understand {:?}: {}", utterance, e),
                );
                return None;
            }
        };

        tracing::debug!(
            "parsed: {:.2} for {:?}",
            command.amount,
            command.description
        );

        match self
            .sink
            .add_record(&command.description, command.amount)
            .await
        {
            Ok(()) => Some(command),
            Err(e) => {
                // no automatic retry; the next attempt is a fresh capture
                self.reporter.report(
                    ReportKind::Record,
                    &format!("could not save expense via {}: {}", self.sink.name(), e),
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use crate::record::RecordSink;
    use crate::report::MemoryReporter;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySink {
        records: Mutex<Vec<(String, f64)>>,
        reject: bool,
    }

    impl MemorySink {
        fn rejecting() -> Self {
            Self {
                reject: true,
                ..Self::default()
            }
        }

        fn records(&self) -> Vec<(String, f64)> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecordSink for MemorySink {
        async fn add_record(&self, description: &str, amount: f64) -> Result<(), RecordError> {
            if self.reject {
                return Err(RecordError::Rejected("remote said no".to_string()));
            }
            self.records
                .lock()
                .unwrap()
                .push((description.to_string(), amount));
            Ok(())
        }

        fn name(&self) -> &'static str {
            "memory"
        }
    }

    fn make_pipeline(
        sink: Arc<MemorySink>,
        reporter: Arc<MemoryReporter>,
    ) -> CommandPipeline {
        CommandPipeline::new(TranscriptParser::default(), sink, reporter)
    }

    #[tokio::test]
    async fn test_successful_cycle_records_expense() {
        let sink = Arc::new(MemorySink::default());
        let reporter = Arc::new(MemoryReporter::new());
        let mut pipeline = make_pipeline(sink.clone(), reporter.clone());

        let command = pipeline
            .handle_transcript("Spent $10.50 on coffee")
            .await
            .unwrap();
        assert_eq!(command.amount, 10.50);
        assert_eq!(command.description, "coffee");

        assert_eq!(sink.records(), vec![("coffee".to_string(), 10.50)]);
        assert!(reporter.take().is_empty());
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn test_parse_failure_reports_warning() {
        let sink = Arc::new(MemorySink::default());
        let reporter = Arc::new(MemoryReporter::new());
        let mut pipeline = make_pipeline(sink.clone(), reporter.clone());

        assert!(pipeline.handle_transcript("hello there").await.is_none());

        assert!(sink.records().is_empty());
        let reports = reporter.take();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, ReportKind::Parse);
        assert!(reports[0].1.contains("hello there"));
    }

    #[tokio::test]
    async fn test_sink_rejection_reports_downstream_error() {
        let sink = Arc::new(MemorySink::rejecting());
        let reporter = Arc::new(MemoryReporter::new());
        let mut pipeline = make_pipeline(sink, reporter.clone());

        assert!(
            pipeline
                .handle_transcript("spent $5 on snacks")
                .await
                .is_none()
        );

        let reports = reporter.take();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, ReportKind::Record);
        assert!(reports[0].1.contains("remote said no"));
    }

    #[tokio::test]
    async fn test_pipeline_survives_failures() {
        let sink = Arc::new(MemorySink::default());
        let reporter = Arc::new(MemoryReporter::new());
        let mut pipeline = make_pipeline(sink.clone(), reporter.clone());

        assert!(pipeline.handle_transcript("no numbers here").await.is_none());
        assert!(pipeline.handle_transcript("$5").await.is_none());
        assert!(
            pipeline
                .handle_transcript("log 15 euro taxi")
                .await
                .is_some()
        );

        assert_eq!(sink.records(), vec![("taxi".to_string(), 15.0)]);
        assert_eq!(reporter.take().len(), 2);
    }
}
