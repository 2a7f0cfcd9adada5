//! Voxpense: voice expense capture for the terminal
//!
//! This library provides the core functionality for:
//! - Driving a host speech-recognition capability through an explicit
//!   session state machine (start/stop/abort, single-flight)
//! - Parsing finalized utterances into `{amount, description}` expense
//!   commands with an ordered chain of numeric idioms
//! - Classifying engine failures into a closed error taxonomy
//! - Appending parsed expenses to a JSON-lines journal
//!
//! # Architecture
//!
//! ```text
//!                  ┌─────────────────────────────────────┐
//!                  │               Daemon                │
//!                  │   (SIGUSR1/SIGUSR2, state file)     │
//!                  └─────────────────────────────────────┘
//!                                    │
//!                                    ▼
//!                           ┌──────────────┐   events   ┌──────────────┐
//!                           │ SpeechSession│ ◀───────── │    Speech    │
//!                           │ Idle/Listen/ │            │  capability  │
//!                           │    Error     │            │(command/mock)│
//!                           └──────────────┘            └──────────────┘
//!                                    │ finalized utterance
//!                                    ▼
//!                           ┌──────────────┐
//!                           │   Command    │──▶ parse failure ──▶ Reporter
//!                           │   Pipeline   │
//!                           └──────────────┘
//!                                    │ {amount, description}
//!                                    ▼
//!                           ┌──────────────┐
//!                           │  RecordSink  │
//!                           │  (journal)   │
//!                           └──────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod daemon;
pub mod error;
pub mod parse;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod session;
pub mod speech;
pub mod state;
pub mod translate;

pub use cli::{Cli, Commands, RecordAction};
pub use config::Config;
pub use daemon::Daemon;
pub use error::{Result, VoxpenseError};
pub use parse::{ParsedCommand, TranscriptParser};
pub use session::{SpeechSession, TurnOutcome};
pub use state::SessionState;
