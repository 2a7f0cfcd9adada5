//! Development tasks for voxpense
//!
//! Usage:
//!   cargo xtask install     Install release binary to /usr/local/bin (requires sudo)
//!   cargo xtask uninstall   Remove binary from /usr/local/bin (requires sudo)
//!   cargo xtask dist        Build release binary for distribution

use std::env;
use std::path::PathBuf;
use std::process::{Command, ExitCode};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        print_help();
        return ExitCode::SUCCESS;
    }

    let result = match args[0].as_str() {
        "install" => install(),
        "uninstall" => uninstall(),
        "dist" => dist(),
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_help();
            Err(anyhow::anyhow!("Unknown command"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("Development tasks for voxpense");
    println!();
    println!("Usage:");
    println!("  cargo xtask install     Install release binary to /usr/local/bin");
    println!("  cargo xtask uninstall   Remove binary from /usr/local/bin");
    println!("  cargo xtask dist        Build release binary for distribution");
}

fn workspace_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("cannot locate workspace root"))
}

fn build_release() -> anyhow::Result<()> {
    println!("Building release binary...");
    let status = Command::new("cargo")
        .args(["build", "--release", "-p", "voxpense"])
        .current_dir(workspace_root()?)
        .status()?;

    if !status.success() {
        anyhow::bail!("cargo build failed");
    }
    Ok(())
}

fn install() -> anyhow::Result<()> {
    build_release()?;

    let binary = workspace_root()?.join("target/release/voxpense");
    println!("Installing to /usr/local/bin/voxpense (requires sudo)...");

    let status = Command::new("sudo")
        .args(["install", "-m", "755"])
        .arg(&binary)
        .arg("/usr/local/bin/voxpense")
        .status()?;

    if !status.success() {
        anyhow::bail!("install failed");
    }

    println!("Installed. Run 'voxpense' to start the daemon.");
    Ok(())
}

fn uninstall() -> anyhow::Result<()> {
    println!("Removing /usr/local/bin/voxpense (requires sudo)...");
    let status = Command::new("sudo")
        .args(["rm", "-f", "/usr/local/bin/voxpense"])
        .status()?;

    if !status.success() {
        anyhow::bail!("uninstall failed");
    }
    Ok(())
}

fn dist() -> anyhow::Result<()> {
    build_release()?;
    let binary = workspace_root()?.join("target/release/voxpense");
    println!("Release binary: {}", binary.display());
    Ok(())
}
