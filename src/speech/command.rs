//! Command speech backend
//!
//! Spawns an external recognizer process for each capture turn. The
//! recognizer contract is line-oriented:
//!
//! - each non-empty stdout line is one finalized recognition result
//! - on failure, stderr carries a single error code token
//!   ("no-speech", "network", ...) and the process exits nonzero
//! - closing the recognizer's stdin asks it to finalize and exit
//!
//! The configured language and capture flags are passed to the child in
//! `VOXPENSE_SPEECH_*` environment variables.

use super::{SpeechCapability, SpeechEvent};
use crate::config::SpeechConfig;
use crate::error::SessionError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Speech capability backed by an external recognizer process
pub struct CommandCapability {
    program: PathBuf,
    args: Vec<String>,
    language: String,
    continuous: bool,
    interim_results: bool,
    tx: UnboundedSender<SpeechEvent>,
    stdin: Option<ChildStdin>,
    turn: Option<JoinHandle<()>>,
}

impl CommandCapability {
    /// Resolve the recognizer on PATH; fails with `UnsupportedCapability`
    /// when none is configured or the binary cannot be found
    pub fn new(
        config: &SpeechConfig,
        tx: UnboundedSender<SpeechEvent>,
    ) -> Result<Self, SessionError> {
        let command = config.command.trim();
        if command.is_empty() {
            return Err(SessionError::UnsupportedCapability(
                "no recognizer command configured".to_string(),
            ));
        }

        let program = which::which(command).map_err(|_| {
            SessionError::UnsupportedCapability(format!("'{}' not found in PATH", command))
        })?;

        Ok(Self {
            program,
            args: config.args.clone(),
            language: config.language.clone(),
            continuous: config.continuous,
            interim_results: config.interim_results,
            tx,
            stdin: None,
            turn: None,
        })
    }
}

#[async_trait]
impl SpeechCapability for CommandCapability {
    async fn start(&mut self) -> Result<(), SessionError> {
        if self.turn.as_ref().is_some_and(|turn| !turn.is_finished()) {
            return Err(SessionError::Capture(
                "recognizer already running".to_string(),
            ));
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("VOXPENSE_SPEECH_LANGUAGE", &self.language)
            .env("VOXPENSE_SPEECH_CONTINUOUS", self.continuous.to_string())
            .env(
                "VOXPENSE_SPEECH_INTERIM",
                self.interim_results.to_string(),
            )
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SessionError::Capture(format!("failed to spawn {:?}: {}", self.program, e))
            })?;

        self.stdin = child.stdin.take();
        let stdout = child.stdout.take().ok_or_else(|| {
            SessionError::Capture("recognizer stdout unavailable".to_string())
        })?;

        tracing::debug!("recognizer started: {:?}", self.program);
        self.turn = Some(tokio::spawn(run_turn(child, stdout, self.tx.clone())));
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), SessionError> {
        if self.turn.is_none() {
            return Err(SessionError::Capture("no capture in progress".to_string()));
        }

        // Closing stdin asks the recognizer to finalize; the End event
        // arrives when the process exits
        match self.stdin.take() {
            Some(stdin) => {
                drop(stdin);
                Ok(())
            }
            None => Err(SessionError::Capture(
                "recognizer input already closed".to_string(),
            )),
        }
    }

    fn abort(&mut self) {
        self.stdin = None;
        if let Some(turn) = self.turn.take() {
            // kill_on_drop reaps the child when the task is cancelled
            turn.abort();
        }
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

/// Pump one capture turn: stdout lines become final results, a nonzero
/// exit becomes an error event, and End always closes the turn
async fn run_turn(mut child: Child, stdout: ChildStdout, tx: UnboundedSender<SpeechEvent>) {
    let mut lines = BufReader::new(stdout).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if !line.is_empty() {
            let _ = tx.send(SpeechEvent::FinalResult(line.to_string()));
        }
    }

    let mut stderr_buf = String::new();
    if let Some(mut stderr) = child.stderr.take() {
        let _ = stderr.read_to_string(&mut stderr_buf).await;
    }

    match child.wait().await {
        Ok(status) if status.success() => {}
        Ok(status) => {
            let code = stderr_buf
                .split_whitespace()
                .next()
                .map(str::to_string)
                .unwrap_or_else(|| format!("exit-{}", status.code().unwrap_or(-1)));
            tracing::debug!("recognizer failed with code {:?}", code);
            let _ = tx.send(SpeechEvent::Error(code));
        }
        Err(e) => {
            tracing::warn!("failed to reap recognizer: {}", e);
            let _ = tx.send(SpeechEvent::Error("aborted".to_string()));
        }
    }

    let _ = tx.send(SpeechEvent::End);
}
