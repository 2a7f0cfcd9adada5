//! Configuration loading and types for voxpense
//!
//! Configuration is loaded in layers:
//! 1. Built-in defaults
//! 2. Config file (~/.config/voxpense/config.toml)
//! 3. Environment variables (VOXPENSE_*)
//! 4. CLI arguments (highest priority)

use crate::error::VoxpenseError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"# Voxpense Configuration
#
# Location: ~/.config/voxpense/config.toml
# All settings can be overridden via CLI flags

# State file for external integrations (Waybar, polybar, etc.)
# Use "auto" for default location ($XDG_RUNTIME_DIR/voxpense/state),
# a custom path, or "disabled" to turn off. The daemon writes state
# ("idle", "listening", "processing", "error") to this file whenever
# it changes. Required for `voxpense status`.
state_file = "auto"

[speech]
# Speech backend: "command" or "mock"
# - command: run an external recognizer process per capture turn
# - mock: scripted backend, only useful for tests and dry runs
backend = "command"

# Recognizer program (resolved on PATH). The contract is line-oriented:
# each non-empty stdout line is one finalized utterance; on failure the
# program prints a single error code token on stderr and exits nonzero.
# command = "my-recognizer"

# Extra arguments passed to the recognizer
# args = []

# Recognition language (passed to the recognizer via environment)
language = "en-US"

# Keep recognizing across pauses instead of ending after one utterance
continuous = false

# Ask the recognizer for interim (non-final) results; voxpense ignores
# them, so leave this off unless the recognizer needs it
interim_results = false

[parser]
# Extra filler words trimmed from the ends of a description, in
# addition to the built-in set ("spent", "add", "log", ...)
# extra_fillers = ["um", "uh"]

[journal]
# Where parsed expenses are appended as JSON lines.
# Use "auto" for the default location (~/.local/share/voxpense/
# journal.jsonl), a custom path, or "disabled" to only log records.
path = "auto"

[notification]
# Show a desktop notification when listening starts
on_listening = false

# Show a desktop notification when an expense is added
on_record_added = true

# Show a desktop notification when a capture turn fails
on_error = true
"#;

/// Speech backend selection
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeechBackend {
    /// External recognizer process (default)
    #[default]
    Command,
    /// Scripted backend for tests and dry runs
    Mock,
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default)]
    pub journal: JournalConfig,

    #[serde(default)]
    pub notification: NotificationConfig,

    /// Optional path to state file for external integrations (e.g. Waybar)
    /// When set, the daemon writes the current state ("idle", "listening",
    /// "processing", "error") to this file whenever state changes.
    /// Example: "/run/user/1000/voxpense/state" or "auto" for the default
    #[serde(default = "default_state_file")]
    pub state_file: Option<String>,
}

/// Speech capability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    /// Backend: command (external recognizer) or mock
    #[serde(default)]
    pub backend: SpeechBackend,

    /// Recognizer program name, resolved on PATH
    #[serde(default)]
    pub command: String,

    /// Extra arguments passed to the recognizer
    #[serde(default)]
    pub args: Vec<String>,

    /// Recognition language, e.g. "en-US"
    #[serde(default = "default_language")]
    pub language: String,

    /// Keep recognizing across pauses
    #[serde(default)]
    pub continuous: bool,

    /// Ask the recognizer for interim results
    #[serde(default)]
    pub interim_results: bool,
}

/// Transcript parser configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ParserConfig {
    /// Extra filler words trimmed from description ends, extending the
    /// built-in set
    #[serde(default)]
    pub extra_fillers: Vec<String>,
}

/// Expense journal configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JournalConfig {
    /// "auto", "disabled", or an explicit file path
    #[serde(default = "default_journal_path")]
    pub path: Option<String>,
}

/// Desktop notification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// Notify when listening starts
    #[serde(default)]
    pub on_listening: bool,

    /// Notify when an expense record is added
    #[serde(default = "default_true")]
    pub on_record_added: bool,

    /// Notify when a capture turn fails
    #[serde(default = "default_true")]
    pub on_error: bool,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_state_file() -> Option<String> {
    Some("auto".to_string())
}

fn default_journal_path() -> Option<String> {
    Some("auto".to_string())
}

fn default_true() -> bool {
    true
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            backend: SpeechBackend::Command,
            command: String::new(),
            args: vec![],
            language: default_language(),
            continuous: false,
            interim_results: false,
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: default_journal_path(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            on_listening: false,
            on_record_added: true,
            on_error: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speech: SpeechConfig::default(),
            parser: ParserConfig::default(),
            journal: JournalConfig::default(),
            notification: NotificationConfig::default(),
            state_file: default_state_file(),
        }
    }
}

impl JournalConfig {
    /// Resolve the journal path from config
    /// Returns None when the journal is explicitly disabled
    pub fn resolve_path(&self) -> Option<PathBuf> {
        self.path.as_ref().and_then(|path| {
            match path.to_lowercase().as_str() {
                "disabled" | "none" | "off" | "false" => None,
                "auto" => Some(Config::data_dir().join("journal.jsonl")),
                _ => Some(PathBuf::from(path)),
            }
        })
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "voxpense")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the runtime directory for ephemeral files (state, pid)
    pub fn runtime_dir() -> PathBuf {
        // Use XDG_RUNTIME_DIR if available, otherwise fall back to /tmp
        std::env::var("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
            .join("voxpense")
    }

    /// Resolve the state file path from config
    /// Returns None if state_file is not configured or explicitly disabled
    pub fn resolve_state_file(&self) -> Option<PathBuf> {
        self.state_file.as_ref().and_then(|path| {
            match path.to_lowercase().as_str() {
                "disabled" | "none" | "off" | "false" => None,
                "auto" => Some(Self::runtime_dir().join("state")),
                _ => Some(PathBuf::from(path)),
            }
        })
    }

    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "voxpense")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the data directory path (for the journal)
    pub fn data_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "voxpense")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Ensure all required directories exist
    pub fn ensure_directories() -> std::io::Result<()> {
        if let Some(config_dir) = Self::config_dir() {
            std::fs::create_dir_all(&config_dir)?;
            tracing::debug!("Ensured config directory exists: {:?}", config_dir);
        }

        let data_dir = Self::data_dir();
        std::fs::create_dir_all(&data_dir)?;
        tracing::debug!("Ensured data directory exists: {:?}", data_dir);

        Ok(())
    }
}

/// Load configuration from file, with defaults for missing values
pub fn load_config(path: Option<&Path>) -> Result<Config, VoxpenseError> {
    // Start with defaults
    let mut config = Config::default();

    // Determine config file path
    let config_path = path.map(PathBuf::from).or_else(Config::default_path);

    // Load from file if it exists
    if let Some(ref path) = config_path {
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)
                .map_err(|e| VoxpenseError::Config(format!("Failed to read config: {}", e)))?;

            config = toml::from_str(&contents)
                .map_err(|e| VoxpenseError::Config(format!("Invalid config: {}", e)))?;
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
        }
    }

    // Override from environment variables
    if let Ok(command) = std::env::var("VOXPENSE_SPEECH_COMMAND") {
        config.speech.command = command;
    }
    if let Ok(backend) = std::env::var("VOXPENSE_SPEECH_BACKEND") {
        config.speech.backend = match backend.to_lowercase().as_str() {
            "mock" => SpeechBackend::Mock,
            _ => SpeechBackend::Command,
        };
    }
    if let Ok(language) = std::env::var("VOXPENSE_LANGUAGE") {
        config.speech.language = language;
    }
    if let Ok(journal) = std::env::var("VOXPENSE_JOURNAL") {
        config.journal.path = Some(journal);
    }

    Ok(config)
}

/// Save configuration to file
#[allow(dead_code)]
pub fn save_config(config: &Config, path: &Path) -> Result<(), VoxpenseError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| VoxpenseError::Config(format!("Failed to create config dir: {}", e)))?;
    }

    let contents = toml::to_string_pretty(config)
        .map_err(|e| VoxpenseError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(path, contents)
        .map_err(|e| VoxpenseError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}
