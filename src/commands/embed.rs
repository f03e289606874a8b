//! Embed command - hide a message or file inside a carrier.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::{debug, info};

use stegvault::{embed_with_config, CarrierKind, Secret, SecretKind};

use super::{CarrierArgs, CommandExecutor};

/// Hide an encrypted secret inside a carrier.
///
/// Images come out as PNG, WAV audio stays WAV, and video gets the blob appended.
#[derive(Args, Debug)]
pub struct EmbedCommand {
    #[command(flatten)]
    pub carrier: CarrierArgs,

    /// Text message to hide (mutually exclusive with --file)
    #[arg(short, long, conflicts_with = "file")]
    pub message: Option<String>,

    /// File to hide: audio, image, or video (mutually exclusive with --message)
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Kind of the --file content; inferred from its extension if omitted
    #[arg(long, requires = "file")]
    pub kind: Option<SecretKind>,

    /// Passphrase used to derive the encryption key
    #[arg(short, long)]
    pub passphrase: String,

    /// Output path for the carrier with the hidden secret
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for EmbedCommand {
    fn execute(&self) -> Result<()> {
        if self.passphrase.is_empty() {
            bail!("Passphrase must not be empty");
        }

        let media = self.carrier.kind()?;
        let config = self.carrier.load_config()?;
        let carrier = self.carrier.read_carrier()?;
        let secret = self.read_secret()?.with_timestamp(unix_now()?);

        debug!(
            carrier = %self.carrier.carrier.display(),
            media = %media,
            secret = %secret.kind(),
            "embedding"
        );

        let mut embedded = embed_with_config(&secret, &self.passphrase, &carrier, media, &config)
            .context("Failed to embed secret")?;
        if let Some(ext) = self.carrier.extension() {
            embedded = embedded.with_original_extension(&ext);
        }

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&embedded.filename));
        std::fs::write(&output, &embedded.bytes)
            .with_context(|| format!("Failed to write output {}", output.display()))?;

        info!(output = %output.display(), bytes = embedded.bytes.len(), "secret embedded");
        println!("Embedded {} secret into {}", secret.kind(), output.display());
        println!("Content type: {}", embedded.content_type);
        Ok(())
    }
}

impl EmbedCommand {
    fn read_secret(&self) -> Result<Secret> {
        if let Some(message) = &self.message {
            if message.is_empty() {
                bail!("Message must not be empty");
            }
            return Ok(Secret::text(message.as_str()));
        }

        let Some(path) = &self.file else {
            bail!("Either --message or --file must be provided");
        };
        let kind = match self.kind {
            Some(kind) => kind,
            None => secret_kind_for(path)?,
        };
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read secret file {}", path.display()))?;
        if content.is_empty() {
            bail!("Secret file {} is empty", path.display());
        }

        let size = content.len() as u64;
        Ok(Secret::from_content(kind, content)?.with_size(size))
    }
}

fn secret_kind_for(path: &Path) -> Result<SecretKind> {
    let is_text = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
    if is_text {
        return Ok(SecretKind::Text);
    }

    match CarrierKind::from_path(path) {
        Some(CarrierKind::Image) => Ok(SecretKind::Image),
        Some(CarrierKind::Audio) => Ok(SecretKind::Audio),
        Some(CarrierKind::Video) => Ok(SecretKind::Video),
        None => bail!(
            "Cannot infer secret kind of {}; pass --kind text|audio|image|video",
            path.display()
        ),
    }
}

fn unix_now() -> Result<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?;
    Ok(elapsed.as_secs() as i64)
}
