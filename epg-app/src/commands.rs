use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use epg_config::EpgConfig;
use epg_foxtel::FoxtelSite;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the region's channels with their site ids.
    Channels,
    /// Print one channel's schedule for one day.
    Grab {
        /// Site id as printed by `channels`, e.g. `Fox-Sports-503/FS3`.
        #[arg(long)]
        channel: String,
        /// Day to grab (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
        /// Skip per-program detail pages; `desc` stays empty.
        #[arg(long)]
        no_details: bool,
    },
}

pub async fn run<W: Write>(command: Command, cfg: EpgConfig, out: W) -> Result<()> {
    let site = FoxtelSite::new(cfg.site, &cfg.http)?;
    match command {
        Command::Channels => {
            let channels = site.channels().await;
            tracing::info!(count = channels.len(), "epg.channels");
            emit(out, &channels)
        }
        Command::Grab {
            channel,
            date,
            no_details,
        } => {
            let schedule = site.grab(&channel, date, !no_details).await?;
            tracing::info!(
                channel = %channel,
                %date,
                programs = schedule.programs.len(),
                ended_on = %schedule.date,
                "epg.grabbed"
            );
            emit(out, &schedule.programs)
        }
    }
}

fn emit<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
