use anyhow::{Context, Result};
use clap::Parser;
use epg_common::observability::init_logging;
use epg_config::{EpgConfig, EpgConfigLoader};
use std::path::PathBuf;
mod commands;

/// Grab foxtel.com.au guide data as JSON.
#[derive(Debug, Parser)]
#[command(name = "epg", version, about)]
struct Cli {
    /// YAML configuration; missing files fall back to defaults.
    #[arg(long, short, env = "EPG_CONFIG", default_value = "epg.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Env wins over the file.
    let cfg: EpgConfig = EpgConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let log_path = init_logging(&cfg.logging)?;
    tracing::debug!(log = %log_path.display(), "epg.start");

    commands::run(cli.command, cfg, std::io::stdout().lock())
        .await
}
