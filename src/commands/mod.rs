//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod capacity;
mod embed;
mod extract;

pub use capacity::CapacityCommand;
pub use embed::EmbedCommand;
pub use extract::ExtractCommand;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;

use stegvault::{CarrierKind, StegoConfig};

/// Trait for command execution - Strategy pattern.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}

/// Carrier selection shared by every command.
#[derive(Args, Debug)]
pub struct CarrierArgs {
    /// Path to the carrier file (image, WAV audio, or video)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Carrier media type (image, audio, video); inferred from the extension if omitted
    #[arg(long)]
    pub media: Option<CarrierKind>,

    /// JSON config file overriding size limits and KDF iterations
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CarrierArgs {
    /// Resolves the carrier kind from `--media` or the carrier's extension.
    pub fn kind(&self) -> Result<CarrierKind> {
        if let Some(kind) = self.media {
            return Ok(kind);
        }
        CarrierKind::from_path(&self.carrier).ok_or_else(|| {
            anyhow!(
                "Cannot infer media type of {}; pass --media image|audio|video",
                self.carrier.display()
            )
        })
    }

    pub fn read_carrier(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.carrier)
            .with_context(|| format!("Failed to read carrier {}", self.carrier.display()))
    }

    pub fn load_config(&self) -> Result<StegoConfig> {
        match &self.config {
            Some(path) => StegoConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(StegoConfig::default()),
        }
    }

    /// Lowercased extension of the carrier path, if any.
    pub fn extension(&self) -> Option<String> {
        self.carrier
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}
