// Command-line interface definitions for voxpense
//
// This module is separate so it can be used by both the binary (main.rs)
// and build.rs for generating man pages.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "voxpense")]
#[command(author, version, about = "Voice expense capture for the terminal")]
#[command(long_about = "
Voxpense turns short spoken utterances into expense records.
Say something like 'spent 10 dollars on coffee' and it lands in a
JSON-lines journal.

SETUP:
  1. Configure a recognizer: set [speech] command in
     ~/.config/voxpense/config.toml to a program that prints finalized
     utterances on stdout
  2. Run: voxpense (to start the daemon)
  3. Bind `voxpense record start` / `voxpense record stop` to a hotkey
     in your compositor or window manager

USAGE:
  Trigger `voxpense record start`, speak one expense, and stop (or let
  the recognizer end the turn). Parse failures are warnings; just
  try again.
")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Override the speech backend ("command" or "mock")
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<String>,

    /// Override the recognizer command
    #[arg(long, value_name = "PROGRAM")]
    pub recognizer: Option<String>,

    /// Override the recognition language (e.g. en-US)
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Disable the journal (records are only logged)
    #[arg(long)]
    pub no_journal: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as daemon (default if no command specified)
    Daemon,

    /// Parse a transcript without recording it (for testing grammars)
    Parse {
        /// The utterance, e.g.: voxpense parse spent 5 dollars on coffee
        #[arg(required = true)]
        text: Vec<String>,

        /// Output the parsed command as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show current configuration
    Config,

    /// Show daemon status (for Waybar/polybar integration)
    Status {
        /// Output format: "text" (default) or "json" (for Waybar)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Control the daemon from external sources (compositor keybindings)
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Start listening (send SIGUSR1 to daemon)
    Start,
    /// Stop listening and process the utterance (send SIGUSR2 to daemon)
    Stop,
}
