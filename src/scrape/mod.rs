// src/scrape/mod.rs

pub mod dates;
pub mod html;
pub mod table;

pub use dates::{list_snapshot_dates, SnapshotDate};
pub use table::{extract_table, ProgramRow, SnapshotTable};
