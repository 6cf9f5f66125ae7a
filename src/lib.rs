pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod process;
pub mod scrape;

pub use dataset::Dataset;
pub use error::{Result, ScrapeError};
pub use process::{build_dataset, ErrorPolicy, RunOptions};
pub use scrape::{extract_table, list_snapshot_dates, SnapshotDate, SnapshotTable};
