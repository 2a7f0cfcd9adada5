//! Voxpense - voice expense capture for the terminal
//!
//! Run with `voxpense` or `voxpense daemon` to start the daemon.
//! Use `voxpense parse <text>` to try the transcript parser directly.
//! Use `voxpense record start|stop` to control a running daemon.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use voxpense::cli::{Cli, Commands, RecordAction};
use voxpense::config::{self, Config, SpeechBackend};
use voxpense::parse::TranscriptParser;
use voxpense::Daemon;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("voxpense={},warn", log_level))),
        )
        .with_target(false)
        .init();

    // Load configuration
    let mut config = config::load_config(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(backend) = cli.backend {
        config.speech.backend = match backend.to_lowercase().as_str() {
            "mock" => SpeechBackend::Mock,
            "command" => SpeechBackend::Command,
            other => anyhow::bail!("unknown speech backend '{}'", other),
        };
    }
    if let Some(recognizer) = cli.recognizer {
        config.speech.command = recognizer;
    }
    if let Some(language) = cli.language {
        config.speech.language = language;
    }
    if cli.no_journal {
        config.journal.path = Some("disabled".to_string());
    }

    match cli.command {
        None | Some(Commands::Daemon) => {
            let mut daemon = Daemon::new(config);
            daemon.run().await?;
        }

        Some(Commands::Parse { text, json }) => {
            run_parse(&config, &text.join(" "), json)?;
        }

        Some(Commands::Config) => {
            show_config(&config)?;
        }

        Some(Commands::Status { format }) => {
            run_status(&config, &format)?;
        }

        Some(Commands::Record { action }) => {
            run_record(action)?;
        }
    }

    Ok(())
}

/// Parse a transcript from the command line without recording it
fn run_parse(config: &Config, text: &str, json: bool) -> anyhow::Result<()> {
    let parser = TranscriptParser::new(&config.parser);

    match parser.parse(text) {
        Ok(command) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&command)?);
            } else {
                println!("amount:      {:.2}", command.amount);
                println!("description: {}", command.description);
            }
            Ok(())
        }
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Show the effective configuration
fn show_config(config: &Config) -> anyhow::Result<()> {
    if let Some(path) = Config::default_path() {
        println!("# Config file: {:?}", path);
        if !path.exists() {
            println!("# (not present, showing defaults)");
        }
    }
    println!();
    print!("{}", toml::to_string_pretty(config)?);

    println!();
    if let Some(path) = config.resolve_state_file() {
        println!("# State file: {:?}", path);
    }
    match config.journal.resolve_path() {
        Some(path) => println!("# Journal: {:?}", path),
        None => println!("# Journal: disabled"),
    }
    Ok(())
}

/// Show daemon status from the state file
fn run_status(config: &Config, format: &str) -> anyhow::Result<()> {
    let state = config
        .resolve_state_file()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "stopped".to_string());

    match format {
        "json" => {
            // Waybar-compatible shape
            println!(
                "{}",
                serde_json::json!({ "text": state, "class": state })
            );
        }
        _ => println!("{}", state),
    }
    Ok(())
}

/// Signal a running daemon to start or stop listening
fn run_record(action: RecordAction) -> anyhow::Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let pid_path = Config::runtime_dir().join("pid");
    let pid: i32 = std::fs::read_to_string(&pid_path)
        .map_err(|_| anyhow::anyhow!("daemon not running (no PID file at {:?})", pid_path))?
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid PID file at {:?}", pid_path))?;

    let signal = match action {
        RecordAction::Start => Signal::SIGUSR1,
        RecordAction::Stop => Signal::SIGUSR2,
    };

    kill(Pid::from_raw(pid), signal)
        .map_err(|e| anyhow::anyhow!("failed to signal daemon (pid {}): {}", pid, e))?;
    Ok(())
}
