//! Capacity command - report how much a carrier can hide.

use anyhow::{Context, Result};
use clap::Args;

use stegvault::stego::{open_codec, AudioCodec, ImageCodec};
use stegvault::{plaintext_budget, CarrierCodec, CarrierKind};

use super::{CarrierArgs, CommandExecutor};

/// Show how many bytes a carrier can hide.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    #[command(flatten)]
    pub carrier: CarrierArgs,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self) -> Result<()> {
        let media = self.carrier.kind()?;
        let config = self.carrier.load_config()?;
        let carrier = self.carrier.read_carrier()?;

        println!("Carrier: {} ({})", self.carrier.carrier.display(), media);
        match media {
            CarrierKind::Image => {
                let codec = ImageCodec::from_bytes(&carrier)
                    .context("Failed to open image carrier")?
                    .with_max_payload(config.max_payload_size);
                let (width, height) = codec.image().dimensions();
                println!("  Dimensions:     {}x{}", width, height);
                print_capacity(&codec);
            }
            CarrierKind::Audio => {
                match AudioCodec::new(&carrier).summary() {
                    Some(summary) => {
                        println!("  Channels:       {}", summary.spec.channels);
                        println!("  Sample rate:    {} Hz", summary.spec.sample_rate);
                        println!("  Bits/sample:    {}", summary.spec.bits_per_sample);
                        println!("  Duration:       {:.2} s", summary.duration_secs);
                    }
                    None => println!("  (WAV header could not be parsed)"),
                }
                let codec = open_codec(media, &carrier, &config)
                    .context("Failed to open audio carrier")?;
                print_capacity(codec.as_ref());
            }
            CarrierKind::Video => {
                println!("  Size:           {} bytes", carrier.len());
                println!("  Max overhead:   {}%", config.video_max_overhead_percent);
                let codec = open_codec(media, &carrier, &config)
                    .context("Failed to open video carrier")?;
                print_capacity(codec.as_ref());
            }
        }
        Ok(())
    }
}

fn print_capacity(codec: &dyn CarrierCodec) {
    println!("  Raw capacity:   {} bytes", codec.capacity());
    println!("  Usable payload: {} bytes", codec.usable_capacity());
    println!("  Secret record:  {} bytes max", plaintext_budget(codec));
}
