// src/config.rs

use clap::Parser;
use std::{path::PathBuf, time::Duration};
use url::Url;

use crate::dataset::OutputFormat;
use crate::fetch::DEFAULT_BASE_URL;
use crate::process::{ErrorPolicy, RunOptions};

/// Scrape enrollment statistics for one faculty across every published
/// snapshot date and print them as a single table.
#[derive(Debug, Clone, Parser)]
#[command(name = "statscraper", version, about)]
pub struct Config {
    /// Numerical faculty code
    #[arg(value_name = "FACULTY_CODE")]
    pub faculty: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout (required for parquet)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Worker threads; defaults to the available parallelism
    #[arg(short = 'j', long, env = "STATSCRAPER_THREADS")]
    pub threads: Option<usize>,

    /// Leave out snapshots that fail instead of aborting the run
    #[arg(long)]
    pub skip_failed: bool,

    /// Only scrape these snapshot tokens (as printed by --list-dates)
    #[arg(long = "date", value_name = "TOKEN")]
    pub dates: Vec<String>,

    /// Print the available snapshot tokens and their dates, then exit
    #[arg(long, conflicts_with_all = ["output", "format"])]
    pub list_dates: bool,

    /// Statistics endpoint
    #[arg(long, env = "STATSCRAPER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// HTTP timeout in seconds
    #[arg(long, env = "STATSCRAPER_TIMEOUT", default_value_t = 60)]
    pub timeout: u64,
}

impl Config {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            threads: self.threads,
            policy: if self.skip_failed {
                ErrorPolicy::Skip
            } else {
                ErrorPolicy::FailFast
            },
            only_dates: self.dates.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
