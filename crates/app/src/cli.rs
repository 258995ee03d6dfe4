use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(long, default_value = "all")]
    pub mode: Mode,
    /// Snapshot output for `--mode scrape`; defaults to REDPULSE_SNAPSHOT_PATH.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    All,
    Api,
    Worker,
    /// Fetch once, write the snapshot file and exit.
    Scrape,
}

impl Mode {
    pub fn run_api(self) -> bool {
        matches!(self, Mode::All | Mode::Api)
    }

    pub fn run_worker(self) -> bool {
        matches!(self, Mode::All | Mode::Worker)
    }
}
