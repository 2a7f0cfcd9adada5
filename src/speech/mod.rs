//! Speech capability abstraction
//!
//! The host's speech recognizer is consumed through a capability trait
//! rather than a concrete engine. Backends deliver events over an
//! unbounded channel: events from one capability are observed in the
//! order they were raised and never concurrently with each other.
//!
//! Backends:
//! - `command`: spawns an external recognizer process per capture turn
//! - `mock`: deterministic scripted capability for tests and dry runs

pub mod command;
pub mod mock;

use crate::config::{SpeechBackend, SpeechConfig};
use crate::error::SessionError;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One event raised by the host speech capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A finalized recognition result for the current turn
    FinalResult(String),
    /// The engine failed; payload is the raw engine error code
    Error(String),
    /// The capture turn ended
    End,
}

/// Receiving half of a capability's event stream
pub type SpeechEvents = mpsc::UnboundedReceiver<SpeechEvent>;

/// Trait for host speech-recognition implementations
#[async_trait]
pub trait SpeechCapability: Send {
    /// Begin one capture turn
    async fn start(&mut self) -> Result<(), SessionError>;

    /// Request a graceful end of the current turn; the `End` event
    /// follows asynchronously
    async fn stop(&mut self) -> Result<(), SessionError>;

    /// Abort the current turn immediately, discarding pending work
    fn abort(&mut self);

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Factory function to create a capability based on the configured backend
///
/// Returns the capability together with its event stream. Fails with
/// `UnsupportedCapability` when the host cannot provide the backend.
pub fn create_capability(
    config: &SpeechConfig,
) -> Result<(Box<dyn SpeechCapability>, SpeechEvents), SessionError> {
    let (tx, rx) = mpsc::unbounded_channel();

    let capability: Box<dyn SpeechCapability> = match config.backend {
        SpeechBackend::Command => Box::new(command::CommandCapability::new(config, tx)?),
        SpeechBackend::Mock => Box::new(mock::MockCapability::new(tx)),
    };

    tracing::debug!("speech capability created: {}", capability.name());
    Ok((capability, rx))
}
