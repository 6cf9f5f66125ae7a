// src/scrape/table.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, instrument, trace, warn};

use super::html::{direct_rows, row_cells};
use crate::error::{Result, ScrapeError};

/// Background colour the source uses for every header row.
pub const HEADER_BGCOLOR: &str = "#dadada";

/// Cells before the first semester column: program, obor, směr.
pub const LEADING_CELLS: usize = 3;

/// Output columns that are not semester labels.
pub const FIXED_COLUMNS: [&str; 3] = ["program", "obor", "date"];

static ROWS: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("selector should parse"));
static DATA_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.data1").expect("selector should parse"));

/// One data row of a snapshot table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRow {
    pub program: String,
    pub obor: String,
    /// Raw counts, in the same order as [`SnapshotTable::labels`].
    pub counts: Vec<String>,
}

/// Everything extracted from one snapshot document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotTable {
    pub labels: Vec<String>,
    pub rows: Vec<ProgramRow>,
}

impl SnapshotTable {
    /// `(label, count)` pairs of one row.
    pub fn cells<'a>(&'a self, row: &'a ProgramRow) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(row.counts.iter().map(String::as_str))
    }
}

fn is_header_row(row: &ElementRef<'_>) -> bool {
    row.value()
        .attr("bgcolor")
        .map_or(false, |c| c.trim().eq_ignore_ascii_case(HEADER_BGCOLOR))
}

/// Extract the enrollment table from one snapshot document.
#[instrument(level = "debug", skip(html), fields(html_len = html.len()))]
pub fn extract_table(html: &str) -> Result<SnapshotTable> {
    let doc = Html::parse_document(html);

    // 1) semester labels from the second header row
    let headers: Vec<ElementRef> = doc.select(&ROWS).filter(is_header_row).collect();
    let label_row = headers.get(1).ok_or_else(|| {
        ScrapeError::parse(format!(
            "expected at least 2 header rows (bgcolor={}), found {}",
            HEADER_BGCOLOR,
            headers.len()
        ))
    })?;
    let labels = row_cells(*label_row);
    trace!(?labels, "semester labels");

    // 2) data table, header rows excluded
    let mut tables = doc.select(&DATA_TABLE);
    let table = tables
        .next()
        .ok_or_else(|| ScrapeError::parse("table.data1 not found"))?;
    if tables.next().is_some() {
        warn!("more than one table.data1; using the first");
    }
    let rows = direct_rows(table)
        .into_iter()
        .filter(|r| !is_header_row(r))
        .map(row_cells);

    // 3) classify rows, carrying the current program forward
    let snapshot = build_rows(labels, rows)?;
    debug!(
        labels = snapshot.labels.len(),
        rows = snapshot.rows.len(),
        "extracted snapshot table"
    );
    Ok(snapshot)
}

/// Labels become output columns, so they must be unique and distinct from the
/// fixed columns.
fn check_labels(labels: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if FIXED_COLUMNS.contains(&label.as_str()) {
            return Err(ScrapeError::parse(format!(
                "semester label {:?} collides with a fixed column",
                label
            )));
        }
        if !seen.insert(label.as_str()) {
            return Err(ScrapeError::parse(format!(
                "semester label {:?} appears twice",
                label
            )));
        }
    }
    Ok(())
}

/// Fold raw row cells into [`ProgramRow`]s.
///
/// A row with a non-empty first cell only names the program for the rows that
/// follow it. Any other row is data and must carry exactly one cell per label.
pub fn build_rows<I>(labels: Vec<String>, rows: I) -> Result<SnapshotTable>
where
    I: IntoIterator<Item = Vec<String>>,
{
    check_labels(&labels)?;

    let (_, out) = rows.into_iter().enumerate().try_fold(
        (None::<String>, Vec::new()),
        |(current, mut out), (idx, mut cells)| {
            if cells.len() < LEADING_CELLS {
                return Err(ScrapeError::parse(format!(
                    "row {} has {} cells, expected at least {}",
                    idx,
                    cells.len(),
                    LEADING_CELLS
                )));
            }
            let counts = cells.split_off(LEADING_CELLS);
            // směr is not part of the output
            let mut lead = cells.into_iter();
            let program = lead.next().unwrap_or_default();
            let obor = lead.next().unwrap_or_default();

            if !program.is_empty() {
                trace!(row = idx, %program, "program header");
                return Ok((Some(program), out));
            }

            let program = current.clone().ok_or_else(|| {
                ScrapeError::parse(format!("data row {} appears before any program row", idx))
            })?;
            if counts.len() != labels.len() {
                return Err(ScrapeError::parse(format!(
                    "row {} ({}/{}) has {} data cells for {} semester labels",
                    idx,
                    program,
                    obor,
                    counts.len(),
                    labels.len()
                )));
            }
            out.push(ProgramRow {
                program,
                obor,
                counts,
            });
            Ok((current, out))
        },
    )?;

    Ok(SnapshotTable { labels, rows: out })
}
