// src/process/mod.rs

pub mod aggregate;
pub mod natural;

pub use aggregate::{aggregate, DatedTable};
pub use natural::{natural_cmp, natural_key, natural_sort};

use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::fetch::Source;
use crate::scrape::{extract_table, list_snapshot_dates, SnapshotDate};

/// What to do when one snapshot cannot be fetched or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the whole run with the error of the earliest failing date, in
    /// listing order.
    #[default]
    FailFast,
    /// Log the error and leave that snapshot out.
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Worker pool size; `None` uses the available parallelism.
    pub threads: Option<usize>,
    pub policy: ErrorPolicy,
    /// Only scrape these tokens. Empty means every listed snapshot.
    pub only_dates: Vec<String>,
}

/// Snapshot tokens for `faculty`, placeholder entry removed.
#[instrument(level = "info", skip(source))]
pub fn snapshot_dates<S: Source>(source: &S, faculty: &str) -> Result<Vec<SnapshotDate>> {
    let html = source.fetch_dates(faculty)?;
    let mut dates = list_snapshot_dates(&html)?;
    // first option is "all dates", not a snapshot
    dates.remove(0);
    info!(count = dates.len(), "snapshot dates listed");
    Ok(dates)
}

/// Fetch and extract one snapshot, stamped with its calendar date.
///
/// The token is resolved before the round trip, so a malformed token costs no
/// request and fails like any other snapshot.
#[instrument(level = "debug", skip(source))]
pub fn load_snapshot<S: Source>(
    source: &S,
    faculty: &str,
    date: &SnapshotDate,
) -> Result<DatedTable> {
    let iso = date.iso_date()?;
    let html = source.fetch_snapshot(faculty, date.token())?;
    Ok(DatedTable {
        date: iso,
        table: extract_table(&html)?,
    })
}

/// Whole pipeline: enumerate dates, scrape every snapshot in parallel, merge.
#[instrument(level = "info", skip(source, opts))]
pub fn build_dataset<S: Source>(source: &S, faculty: &str, opts: &RunOptions) -> Result<Dataset> {
    let start = Instant::now();

    let mut dates = snapshot_dates(source, faculty)?;
    if !opts.only_dates.is_empty() {
        dates.retain(|d| opts.only_dates.iter().any(|t| t == d.token()));
        for wanted in &opts.only_dates {
            if !dates.iter().any(|d| d.token() == wanted) {
                warn!(token = %wanted, "requested date not offered by the server");
            }
        }
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = opts.threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build()?;
    info!(
        dates = dates.len(),
        workers = pool.current_num_threads(),
        "scraping snapshots"
    );

    // barrier: every task finishes before anything is merged; results stay in
    // date order whatever order they complete in
    let results: Vec<(SnapshotDate, Result<DatedTable>)> = pool.install(|| {
        dates
            .into_par_iter()
            .map(|date| {
                let res = load_snapshot(source, faculty, &date);
                (date, res)
            })
            .collect()
    });

    let mut tables = Vec::with_capacity(results.len());
    for (date, res) in results {
        match (res, opts.policy) {
            (Ok(table), _) => tables.push(table),
            (Err(e), ErrorPolicy::FailFast) => return Err(e),
            (Err(e), ErrorPolicy::Skip) => {
                warn!(date = %date, error = %e, "skipping snapshot");
            }
        }
    }

    let dataset = aggregate(tables);
    info!(
        rows = dataset.len(),
        columns = dataset.columns().len(),
        elapsed = ?start.elapsed(),
        "dataset built"
    );
    Ok(dataset)
}
