// src/dataset/mod.rs

pub mod arrow;
pub mod write;

pub use self::arrow::{build_arrow_schema, to_record_batch};
pub use write::{write_csv, write_json, write_parquet, OutputFormat};

use crate::scrape::table::FIXED_COLUMNS;

/// A program row stamped with its snapshot date; `cells` is aligned with
/// [`Dataset::semester_columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedRow {
    pub program: String,
    pub obor: String,
    pub date: String,
    pub cells: Vec<Option<String>>,
}

/// All snapshots of one faculty in a single table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Union of semester labels, naturally sorted.
    pub semester_columns: Vec<String>,
    pub rows: Vec<DatedRow>,
}

impl Dataset {
    /// Full header: the fixed columns followed by the semester columns.
    pub fn columns(&self) -> Vec<&str> {
        FIXED_COLUMNS
            .iter()
            .copied()
            .chain(self.semester_columns.iter().map(String::as_str))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in `row`, `None` when the row's snapshot did not
    /// report it.
    pub fn get<'a>(&'a self, row: &'a DatedRow, column: &str) -> Option<&'a str> {
        match column {
            "program" => Some(&row.program),
            "obor" => Some(&row.obor),
            "date" => Some(&row.date),
            label => {
                let idx = self.semester_columns.iter().position(|c| c == label)?;
                row.cells.get(idx)?.as_deref()
            }
        }
    }
}
