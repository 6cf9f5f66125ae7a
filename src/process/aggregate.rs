// src/process/aggregate.rs

use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

use super::natural::natural_sort;
use crate::dataset::{Dataset, DatedRow};
use crate::error::Result;
use crate::scrape::{SnapshotDate, SnapshotTable};

/// A snapshot table with its `YYYY-MM-DD` publication date already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedTable {
    pub date: String,
    pub table: SnapshotTable,
}

impl DatedTable {
    /// Stamp `table` with the calendar date of `date`; fails on a token that is
    /// not a real date.
    pub fn new(date: &SnapshotDate, table: SnapshotTable) -> Result<Self> {
        Ok(Self {
            date: date.iso_date()?,
            table,
        })
    }
}

/// Merge per-snapshot tables into one dataset.
///
/// Input order is irrelevant for the column set and its order; rows keep the
/// input order, each snapshot's rows contiguous.
#[instrument(level = "info", skip(snapshots), fields(snapshots = snapshots.len()))]
pub fn aggregate(snapshots: Vec<DatedTable>) -> Dataset {
    // 1) union of labels, naturally sorted
    let union: BTreeSet<&str> = snapshots
        .iter()
        .flat_map(|s| s.table.labels.iter().map(String::as_str))
        .collect();
    let mut semester_columns: Vec<String> = union.into_iter().map(str::to_owned).collect();
    natural_sort(&mut semester_columns);

    let index: HashMap<&str, usize> = semester_columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    // 2) spread each row over the unified columns
    let mut rows = Vec::with_capacity(snapshots.iter().map(|s| s.table.rows.len()).sum());
    for DatedTable { date, table } in &snapshots {
        let slots: Vec<usize> = table.labels.iter().map(|l| index[l.as_str()]).collect();
        for row in &table.rows {
            let mut cells = vec![None; semester_columns.len()];
            for (&slot, value) in slots.iter().zip(&row.counts) {
                cells[slot] = Some(value.clone());
            }
            rows.push(DatedRow {
                program: row.program.clone(),
                obor: row.obor.clone(),
                date: date.clone(),
                cells,
            });
        }
        debug!(date = %date, rows = table.rows.len(), "merged snapshot");
    }

    Dataset {
        semester_columns,
        rows,
    }
}
