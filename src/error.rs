//! Error types for voxpense
//!
//! Uses thiserror for ergonomic error definitions with clear messages
//! that guide users toward fixing common issues.

use thiserror::Error;

/// Top-level error type for the voxpense application
#[derive(Error, Debug)]
pub enum VoxpenseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech session error: {0}")]
    Session(#[from] SessionError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from parsing a transcript into an expense command
///
/// All of these are recoverable: the user simply speaks again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("utterance was empty")]
    EmptyUtterance,

    #[error("no amount found. Say something like 'spent 10 dollars on coffee'.")]
    NoAmount,

    #[error("no description found. Say what the expense was for, e.g. '5 dollars for lunch'.")]
    NoDescription,
}

/// Errors from the speech capture session
///
/// Turn-ending engine failures travel as
/// [`RecognitionError`](crate::translate::RecognitionError) through the
/// session's turn outcome instead; these cover the session surface itself.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no speech backend available: {0}\n  Set [speech] command in the config to a recognizer on your PATH.")]
    UnsupportedCapability(String),

    #[error("capture request failed: {0}")]
    Capture(String),
}

/// Errors from the record-add collaborator (journal or other sink)
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("record sink rejected the expense: {0}")]
    Rejected(String),

    #[error("journal write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using VoxpenseError
pub type Result<T> = std::result::Result<T, VoxpenseError>;
