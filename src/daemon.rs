//! Daemon module - main event loop orchestration
//!
//! Coordinates the speech session, transcript parsing, and the record
//! journal. Capture turns are controlled externally via SIGUSR1/SIGUSR2
//! (`voxpense record start|stop`), so compositor keybindings can drive
//! the daemon directly.

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::CommandPipeline;
use crate::parse::TranscriptParser;
use crate::record;
use crate::report::{LogReporter, ReportKind, Reporter};
use crate::session::{SpeechSession, TurnOutcome};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tokio::signal::unix::{signal, SignalKind};

/// Send a desktop notification
async fn send_notification(title: &str, body: &str) {
    let _ = Command::new("notify-send")
        .args(["--app-name=Voxpense", "--expire-time=2000", title, body])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
}

/// Write state to file for external integrations (e.g., Waybar)
fn write_state_file(path: &PathBuf, state: &str) {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Failed to create state file directory: {}", e);
            return;
        }
    }

    if let Err(e) = std::fs::write(path, state) {
        tracing::warn!("Failed to write state file: {}", e);
    } else {
        tracing::trace!("State file updated: {}", state);
    }
}

/// Remove state file on shutdown
fn cleanup_state_file(path: &PathBuf) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Failed to remove state file: {}", e);
        }
    }
}

/// Write PID file for external control via signals
fn write_pid_file() -> Option<PathBuf> {
    let pid_path = Config::runtime_dir().join("pid");

    // Ensure parent directory exists
    if let Some(parent) = pid_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Failed to create PID file directory: {}", e);
            return None;
        }
    }

    let pid = std::process::id();
    if let Err(e) = std::fs::write(&pid_path, pid.to_string()) {
        tracing::warn!("Failed to write PID file: {}", e);
        return None;
    }

    tracing::debug!("PID file written: {:?} (pid={})", pid_path, pid);
    Some(pid_path)
}

/// Remove PID file on shutdown
fn cleanup_pid_file(path: &PathBuf) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Failed to remove PID file: {}", e);
        }
    }
}

/// Main daemon that orchestrates all components
pub struct Daemon {
    config: Config,
    state_file_path: Option<PathBuf>,
    pid_file_path: Option<PathBuf>,
}

impl Daemon {
    /// Create a new daemon with the given configuration
    pub fn new(config: Config) -> Self {
        let state_file_path = config.resolve_state_file();

        Self {
            config,
            state_file_path,
            pid_file_path: None,
        }
    }

    /// Update the state file if configured
    fn update_state(&self, state_name: &str) {
        if let Some(ref path) = self.state_file_path {
            write_state_file(path, state_name);
        }
    }

    /// Run the daemon main loop
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Starting voxpense daemon");

        // Write PID file for external control via signals
        self.pid_file_path = write_pid_file();

        // Set up signal handlers for external control
        let mut sigusr1 = signal(SignalKind::user_defined1()).map_err(|e| {
            crate::error::VoxpenseError::Config(format!("Failed to set up SIGUSR1 handler: {}", e))
        })?;
        let mut sigusr2 = signal(SignalKind::user_defined2()).map_err(|e| {
            crate::error::VoxpenseError::Config(format!("Failed to set up SIGUSR2 handler: {}", e))
        })?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(|e| {
            crate::error::VoxpenseError::Config(format!("Failed to set up SIGTERM handler: {}", e))
        })?;

        // Ensure required directories exist
        Config::ensure_directories().map_err(|e| {
            crate::error::VoxpenseError::Config(format!("Failed to create directories: {}", e))
        })?;

        // Log state file if configured
        if let Some(ref path) = self.state_file_path {
            tracing::info!("State file: {:?}", path);
        }

        // Speech session; an unavailable backend is terminal for the daemon
        let (mut session, mut events) = SpeechSession::new(&self.config.speech)?;

        // Parse → record pipeline; the daemon shares the report sink for
        // session-level failures
        let reporter: Arc<dyn Reporter> = Arc::new(LogReporter);
        let sink = record::create_sink(&self.config.journal)?;
        let mut pipeline = CommandPipeline::new(
            TranscriptParser::new(&self.config.parser),
            Arc::from(sink),
            reporter.clone(),
        );

        tracing::info!(
            "Listening for SIGUSR1/SIGUSR2 (use 'voxpense record start' / 'voxpense record stop')"
        );

        // Write initial state
        self.update_state("idle");

        // Main event loop
        loop {
            tokio::select! {
                // Handle speech capability events
                maybe_event = events.recv() => {
                    let Some(event) = maybe_event else {
                        tracing::warn!("Speech backend event stream closed, shutting down");
                        break;
                    };

                    match session.handle_event(event) {
                        Some(TurnOutcome::Transcript(text)) => {
                            self.update_state("processing");

                            if let Some(command) = pipeline.handle_transcript(&text).await {
                                if self.config.notification.on_record_added {
                                    send_notification(
                                        "Expense added",
                                        &format!("{:.2} for {}", command.amount, command.description),
                                    )
                                    .await;
                                }
                            }

                            self.update_state(session.state().label());
                        }
                        Some(TurnOutcome::Failed(error)) => {
                            reporter.report(ReportKind::Session, &error.to_string());
                            if self.config.notification.on_error {
                                send_notification("Capture failed", &error.to_string()).await;
                            }
                            self.update_state(session.state().label());
                        }
                        None => {
                            // state may still have changed (e.g. a bare end event)
                            self.update_state(session.state().label());
                        }
                    }
                }

                // Handle SIGUSR1 - start listening (for compositor keybindings)
                _ = sigusr1.recv() => {
                    tracing::debug!("Received SIGUSR1 (start listening)");
                    match session.start().await {
                        Ok(()) => {
                            if session.state().is_listening() {
                                if self.config.notification.on_listening {
                                    send_notification("Listening", "Speak one expense").await;
                                }
                                self.update_state("listening");
                            }
                        }
                        Err(e) => {
                            tracing::error!("Failed to start listening: {}", e);
                            self.update_state(session.state().label());
                        }
                    }
                }

                // Handle SIGUSR2 - stop listening (for compositor keybindings)
                _ = sigusr2.recv() => {
                    tracing::debug!("Received SIGUSR2 (stop listening)");
                    session.stop().await;
                    // a synchronous stop failure forces idle; reflect it
                    self.update_state(session.state().label());
                }

                // Handle graceful shutdown (SIGINT from Ctrl+C)
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT, shutting down...");
                    break;
                }

                // Handle graceful shutdown (SIGTERM from systemctl stop)
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, shutting down...");
                    break;
                }
            }
        }

        // Cleanup
        session.close();

        // Remove state file on shutdown
        if let Some(ref path) = self.state_file_path {
            cleanup_state_file(path);
        }

        // Remove PID file on shutdown
        if let Some(ref path) = self.pid_file_path {
            cleanup_pid_file(path);
        }

        tracing::info!("Daemon stopped");

        Ok(())
    }
}
