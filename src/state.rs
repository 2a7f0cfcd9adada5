//! State machine states for a speech capture session
//!
//! A session moves through: Idle → Listening → Idle, with Error reachable
//! from Listening when the recognition engine reports a failure. Parsing
//! and record-adding happen outside the session, so there is no
//! "processing" state here; the pipeline owns that phase.

use crate::translate::ErrorCategory;

/// Speech session state
///
/// Mutated only by [`SpeechSession`](crate::session::SpeechSession) event
/// handlers; no external code writes state directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a start request
    Idle,

    /// Host capability is capturing speech
    Listening,

    /// The engine reported a session-ending error; a new start is required
    Error(ErrorCategory),
}

impl SessionState {
    /// Create a new idle state
    pub fn new() -> Self {
        SessionState::Idle
    }

    /// Check if in idle state
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    /// Check if a capture turn is active
    pub fn is_listening(&self) -> bool {
        matches!(self, SessionState::Listening)
    }

    /// Check if the last turn ended in an engine error
    pub fn is_error(&self) -> bool {
        matches!(self, SessionState::Error(_))
    }

    /// Short lowercase label for the state file (bar integrations)
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Listening => "listening",
            SessionState::Error(_) => "error",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Listening => write!(f, "Listening"),
            SessionState::Error(category) => write!(f, "Error ({})", category),
        }
    }
}
