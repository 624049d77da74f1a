use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cardwatch_monitor::{DedupPolicy, MonitorConfig};
use clap::{Parser, ValueEnum};

/// Watch a contactless card reader and print every card presented to it.
#[derive(Debug, Parser)]
#[command(name = "cardwatch", version, about)]
pub struct Args {
    /// TOML configuration file; flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Serial port of the reader (COM3, /dev/ttyUSB0, ...).
    #[arg(short, long)]
    pub port: Option<String>,

    /// Line rate in bits per second.
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// Stop after this many seconds.
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Suppress a card identical to the one just reported.
    #[arg(long)]
    pub dedup: bool,

    /// How each card is printed.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Open and close the port, then exit.
    #[arg(long)]
    pub probe: bool,

    /// Use a simulated reader presenting these card texts, one per second.
    #[arg(long, value_name = "TEXT", num_args = 1..)]
    pub simulate: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Multi-line detailed block per card.
    Text,
    /// One JSON object per line.
    Json,
    /// Only the decimal value, one per line, for forwarding as typed input.
    /// Cards whose conversion failed are skipped.
    Decimal,
}

impl Args {
    /// Defaults, then the config file, then flags.
    pub fn resolve_config(&self) -> Result<MonitorConfig> {
        let mut config = match &self.config {
            Some(path) => MonitorConfig::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => MonitorConfig::default(),
        };

        if let Some(port) = &self.port {
            config.port.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.port.baud_rate = baud;
        }
        if let Some(secs) = self.duration {
            config = config.with_duration(Duration::from_secs(secs));
        }
        if self.dedup {
            config = config.with_dedup(DedupPolicy::SuppressRepeats);
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}
