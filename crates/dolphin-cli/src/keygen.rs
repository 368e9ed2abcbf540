//! API key generation.

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use clap::{Args, ValueEnum};
use rand::RngCore;

use crate::TRACING_TARGET_CONFIG;

/// Encoding of generated keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KeyFormat {
    /// Random bytes, hex-encoded.
    #[default]
    Hex,
    /// UUID v4 without hyphens.
    Uuid,
    /// Random bytes, URL-safe base64 without padding.
    Urlsafe,
}

/// Arguments of `dolphin keygen`.
#[derive(Debug, Clone, Args)]
pub struct KeygenArgs {
    /// Number of keys to generate.
    #[arg(short = 'c', long, default_value_t = 1)]
    pub count: usize,

    /// Key encoding.
    #[arg(short = 't', long = "type", value_enum, default_value_t = KeyFormat::Hex)]
    pub format: KeyFormat,

    /// Number of random bytes per key (ignored for UUIDs).
    #[arg(short = 'l', long, default_value_t = 32)]
    pub length: usize,

    /// Write keys to this file instead of standard output.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Print a single `API_KEYS=...` line for an env file.
    #[arg(long)]
    pub env: bool,
}

impl KeygenArgs {
    fn validate(&self) -> anyhow::Result<()> {
        if self.count == 0 {
            return Err(anyhow!("Key count must be at least 1"));
        }

        if self.format != KeyFormat::Uuid && self.length < 16 {
            return Err(anyhow!(
                "Key length {} is too short, use at least 16 bytes",
                self.length
            ));
        }

        Ok(())
    }
}

/// Generates one key.
pub fn generate_key(format: KeyFormat, length: usize) -> String {
    match format {
        KeyFormat::Uuid => uuid::Uuid::new_v4().simple().to_string(),
        KeyFormat::Hex => hex::encode(random_bytes(length)),
        KeyFormat::Urlsafe => URL_SAFE_NO_PAD.encode(random_bytes(length)),
    }
}

fn random_bytes(length: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; length];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Formats keys one per line, or as a single env assignment.
pub fn render(keys: &[String], env: bool) -> String {
    if env {
        format!("API_KEYS={}\n", keys.join(","))
    } else {
        let mut rendered = keys.join("\n");
        rendered.push('\n');
        rendered
    }
}

/// Runs `dolphin keygen`.
pub fn run(args: &KeygenArgs) -> anyhow::Result<()> {
    args.validate()?;

    let keys: Vec<String> = (0..args.count)
        .map(|_| generate_key(args.format, args.length))
        .collect();
    let rendered = render(&keys, args.env);

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write keys to {}", path.display()))?;
            tracing::info!(
                target: TRACING_TARGET_CONFIG,
                count = keys.len(),
                path = %path.display(),
                "API keys written"
            );
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
