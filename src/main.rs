//! Stegvault - hide encrypted secrets in images, audio, and video.
//!
//! A CLI over the stegvault library: the secret is sealed with a passphrase-derived key
//! and hidden in the least significant bits of an image or WAV file, or appended to a
//! video container.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use commands::{CapacityCommand, CommandExecutor, EmbedCommand, ExtractCommand};

/// Stegvault - hide encrypted secrets in images, audio, and video
#[derive(Parser)]
#[command(name = "stegvault")]
#[command(version)]
#[command(about = "Passphrase-encrypted steganography for images, WAV audio, and video")]
#[command(long_about = None)]
struct Cli {
    /// Verbose output (debug logging; RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a text message or file inside a carrier
    Embed(EmbedCommand),

    /// Recover a hidden secret from a carrier
    Extract(ExtractCommand),

    /// Show how much a carrier can hide
    Capacity(CapacityCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Embed(cmd) => cmd.execute(),
        Commands::Extract(cmd) => cmd.execute(),
        Commands::Capacity(cmd) => cmd.execute(),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
