//! Extract command - recover a hidden secret from a carrier.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::{debug, info, warn};

use stegvault::{extract_with_config, SecretPayload};

use super::{CarrierArgs, CommandExecutor};

/// Recover and decrypt the secret hidden in a carrier.
///
/// Text secrets are printed to stdout unless --output is given; other kinds are
/// written to --output or to a default `extracted_*` filename.
#[derive(Args, Debug)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub carrier: CarrierArgs,

    /// Passphrase used when the secret was embedded
    #[arg(short, long)]
    pub passphrase: String,

    /// Where to write the recovered content
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for ExtractCommand {
    fn execute(&self) -> Result<()> {
        if self.passphrase.is_empty() {
            bail!("Passphrase must not be empty");
        }

        let media = self.carrier.kind()?;
        let config = self.carrier.load_config()?;
        let carrier = self.carrier.read_carrier()?;
        debug!(carrier = %self.carrier.carrier.display(), media = %media, "extracting");

        let secret = extract_with_config(&carrier, media, &self.passphrase, &config)
            .context("Failed to extract secret")?;

        if let Some(timestamp) = secret.timestamp {
            info!(timestamp, "secret timestamp");
        }
        if let Some(size) = secret.size {
            if size != secret.content().len() as u64 {
                warn!(
                    recorded = size,
                    recovered = secret.content().len(),
                    "recorded secret size differs from recovered content"
                );
            }
        }

        match (&secret.payload, &self.output) {
            (SecretPayload::Text(text), None) => {
                println!("{}", text);
            }
            (_, output) => {
                let path = output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(secret.kind().suggested_filename()));
                std::fs::write(&path, secret.content())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!(
                    "Extracted {} secret ({} bytes) to {}",
                    secret.kind(),
                    secret.content().len(),
                    path.display()
                );
            }
        }
        Ok(())
    }
}
