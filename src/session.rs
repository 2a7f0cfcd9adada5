//! Speech capture session
//!
//! Owns one host speech capability and the [`SessionState`] that guards
//! it. The daemon feeds capability events back in through
//! [`SpeechSession::handle_event`]; a turn's outcome (a finalized
//! transcript, or a classified failure) is returned from the handler
//! that closed the turn.
//!
//! Single-flight: `start()` while already listening is a warn-level
//! no-op, so there is never more than one active capture per session.

use crate::config::SpeechConfig;
use crate::error::SessionError;
use crate::speech::{self, SpeechCapability, SpeechEvent, SpeechEvents};
use crate::state::SessionState;
use crate::translate::{self, RecognitionError};

/// How one capture turn ended
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The turn produced a finalized utterance
    Transcript(String),
    /// The engine failed; the session is back to needing a fresh start
    Failed(RecognitionError),
}

/// State machine wrapping a host speech-recognition capability
pub struct SpeechSession {
    state: SessionState,
    capability: Option<Box<dyn SpeechCapability>>,
    transcript: Option<String>,
    last_error: Option<RecognitionError>,
}

impl SpeechSession {
    /// Create a session for the configured backend
    ///
    /// Returns the session together with its event stream; the caller
    /// owns the stream and feeds events back via [`handle_event`].
    ///
    /// [`handle_event`]: SpeechSession::handle_event
    pub fn new(config: &SpeechConfig) -> Result<(Self, SpeechEvents), SessionError> {
        let (capability, events) = speech::create_capability(config)?;
        Ok((Self::from_capability(capability), events))
    }

    /// Wrap an already-constructed capability (used by tests)
    pub fn from_capability(capability: Box<dyn SpeechCapability>) -> Self {
        Self {
            state: SessionState::new(),
            capability: Some(capability),
            transcript: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The error that ended the most recent turn, if any
    pub fn last_error(&self) -> Option<&RecognitionError> {
        self.last_error.as_ref()
    }

    /// Begin a capture turn
    ///
    /// Allowed from `Idle` (and from `Error`, which a new start clears).
    /// A start while already `Listening` is a no-op.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.state.is_listening() {
            tracing::warn!("start requested while already listening, ignoring");
            return Ok(());
        }

        let Some(capability) = self.capability.as_mut() else {
            return Err(SessionError::Capture("session is closed".to_string()));
        };

        self.transcript = None;
        self.last_error = None;
        capability.start().await?;
        self.state = SessionState::Listening;
        tracing::info!("listening");
        Ok(())
    }

    /// Request a graceful end of the current turn
    ///
    /// A no-op unless `Listening`. The state change normally rides on
    /// the capability's `End` event; a synchronous stop failure forces
    /// `Idle` immediately.
    pub async fn stop(&mut self) {
        if !self.state.is_listening() {
            tracing::debug!("stop requested while {}, ignoring", self.state);
            return;
        }

        let Some(capability) = self.capability.as_mut() else {
            return;
        };

        if let Err(e) = capability.stop().await {
            tracing::warn!("stop request failed, ending turn: {}", e);
            self.state = SessionState::Idle;
        }
    }

    /// Apply one capability event to the state machine
    ///
    /// Returns the turn's outcome when this event closed it.
    pub fn handle_event(&mut self, event: SpeechEvent) -> Option<TurnOutcome> {
        match event {
            SpeechEvent::FinalResult(text) => {
                if self.state.is_listening() {
                    tracing::debug!("finalized utterance: {:?}", text);
                    self.last_error = None;
                    self.transcript = Some(text);
                } else {
                    tracing::debug!("discarding final result while {}", self.state);
                }
                None
            }

            SpeechEvent::Error(code) => {
                if !self.state.is_listening() {
                    tracing::debug!("discarding engine error {:?} while {}", code, self.state);
                    return None;
                }
                let error = translate::translate(&code);
                tracing::warn!("recognition error: {}", error);
                self.transcript = None;
                self.state = SessionState::Error(error.category);
                self.last_error = Some(error.clone());
                Some(TurnOutcome::Failed(error))
            }

            SpeechEvent::End => match self.state {
                SessionState::Listening => {
                    self.state = SessionState::Idle;
                    tracing::debug!("capture turn ended");
                    self.transcript.take().map(TurnOutcome::Transcript)
                }
                SessionState::Error(_) => {
                    // trailing end after an engine error completes the turn
                    self.state = SessionState::Idle;
                    None
                }
                SessionState::Idle => {
                    tracing::trace!("end event while idle, ignoring");
                    None
                }
            },
        }
    }

    /// Dispose of the session: abort any in-flight capture and release
    /// the capability so it cannot fire further events. Idempotent.
    pub fn close(&mut self) {
        if let Some(mut capability) = self.capability.take() {
            capability.abort();
            tracing::debug!("speech session closed");
        }
        self.state = SessionState::Idle;
        self.transcript = None;
    }

    pub fn is_closed(&self) -> bool {
        self.capability.is_none()
    }
}

impl Drop for SpeechSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::mock::MockCapability;
    use crate::translate::ErrorCategory;

    fn scripted(turns: Vec<Vec<SpeechEvent>>) -> (SpeechSession, SpeechEvents) {
        let (capability, events, _) = MockCapability::scripted(turns);
        (SpeechSession::from_capability(Box::new(capability)), events)
    }

    #[tokio::test]
    async fn test_successful_turn() {
        let (mut session, mut events) = scripted(vec![vec![
            SpeechEvent::FinalResult("spent $3 on tea".to_string()),
            SpeechEvent::End,
        ]]);

        session.start().await.unwrap();
        assert!(session.state().is_listening());

        let mut outcome = None;
        while let Ok(event) = events.try_recv() {
            if let Some(o) = session.handle_event(event) {
                outcome = Some(o);
            }
        }

        assert_eq!(
            outcome,
            Some(TurnOutcome::Transcript("spent $3 on tea".to_string()))
        );
        assert!(session.state().is_idle());
    }

    #[tokio::test]
    async fn test_start_twice_is_single_flight() {
        let (capability, _events, counters) = MockCapability::scripted(vec![vec![]]);
        let mut session = SpeechSession::from_capability(Box::new(capability));

        session.start().await.unwrap();
        session.start().await.unwrap(); // no-op with a warning
        assert!(session.state().is_listening());
        assert_eq!(counters.starts(), 1);
    }

    #[tokio::test]
    async fn test_error_turn_classifies_and_requires_restart() {
        let (mut session, mut events) = scripted(vec![
            vec![
                SpeechEvent::Error("not-allowed".to_string()),
                SpeechEvent::End,
            ],
            vec![SpeechEvent::End],
        ]);

        session.start().await.unwrap();

        let error_event = events.try_recv().unwrap();
        let outcome = session.handle_event(error_event);
        match outcome {
            Some(TurnOutcome::Failed(err)) => {
                assert_eq!(err.category, ErrorCategory::PermissionDenied);
            }
            other => panic!("expected failed turn, got {:?}", other),
        }
        assert!(session.state().is_error());

        // trailing end completes the transition back to idle
        assert_eq!(session.handle_event(events.try_recv().unwrap()), None);
        assert!(session.state().is_idle());
        assert!(session.last_error().is_some());

        // a fresh start clears the error
        session.start().await.unwrap();
        assert!(session.state().is_listening());
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn test_error_discards_pending_transcript() {
        let (mut session, mut events) = scripted(vec![vec![
            SpeechEvent::FinalResult("half an utterance".to_string()),
            SpeechEvent::Error("network".to_string()),
            SpeechEvent::End,
        ]]);

        session.start().await.unwrap();
        let mut outcomes = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let Some(o) = session.handle_event(event) {
                outcomes.push(o);
            }
        }

        // the only outcome is the failure; the transcript never surfaces
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], TurnOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_stop_from_idle_is_noop() {
        let (capability, _events, counters) = MockCapability::scripted(vec![]);
        let mut session = SpeechSession::from_capability(Box::new(capability));

        session.stop().await;
        assert!(session.state().is_idle());
        assert_eq!(counters.stops(), 0);
    }

    #[tokio::test]
    async fn test_synchronous_stop_failure_forces_idle() {
        let (mut capability, _events, _) = MockCapability::scripted(vec![vec![]]);
        capability.make_stop_fail();
        let mut session = SpeechSession::from_capability(Box::new(capability));

        session.start().await.unwrap();
        assert!(session.state().is_listening());
        session.stop().await;
        assert!(session.state().is_idle());
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_terminal() {
        let (capability, _events, counters) = MockCapability::scripted(vec![vec![]]);
        let mut session = SpeechSession::from_capability(Box::new(capability));

        session.start().await.unwrap();
        session.close();
        session.close();
        assert!(session.is_closed());
        assert!(session.state().is_idle());
        assert_eq!(counters.aborts(), 1);

        assert!(session.start().await.is_err());
    }

    #[tokio::test]
    async fn test_result_outside_listening_is_discarded() {
        let (mut session, _events) = scripted(vec![]);
        let outcome =
            session.handle_event(SpeechEvent::FinalResult("stray".to_string()));
        assert_eq!(outcome, None);
        assert!(session.state().is_idle());

        // an end for a turn we never started is ignored too
        assert_eq!(session.handle_event(SpeechEvent::End), None);
    }
}
