// src/dataset/write.rs

use arrow::csv::WriterBuilder;
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use serde::Serialize;
use std::{collections::BTreeMap, fs::File, io::Write, path::Path};
use tracing::{debug, instrument};

use super::{to_record_batch, Dataset, DatedRow};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Parquet,
}

/// Comma-separated text with a header row; absent cells are empty fields.
#[instrument(level = "debug", skip_all, fields(rows = dataset.len()))]
pub fn write_csv<W: Write>(dataset: &Dataset, out: W) -> Result<()> {
    let batch = to_record_batch(dataset)?;
    let mut writer = WriterBuilder::new().with_header(true).build(out);
    writer.write(&batch)?;
    debug!("csv written");
    Ok(())
}

/// One JSON object per row: the fixed columns, then every semester column.
#[derive(Serialize)]
struct JsonRow<'a> {
    program: &'a str,
    obor: &'a str,
    date: &'a str,
    #[serde(flatten)]
    semesters: BTreeMap<&'a str, Option<&'a str>>,
}

impl<'a> JsonRow<'a> {
    fn new(dataset: &'a Dataset, row: &'a DatedRow) -> Self {
        let semesters = dataset
            .semester_columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), row.cells.get(i).and_then(|v| v.as_deref())))
            .collect();
        Self {
            program: &row.program,
            obor: &row.obor,
            date: &row.date,
            semesters,
        }
    }
}

/// JSON array of objects keyed by column name; absent cells are `null`.
#[instrument(level = "debug", skip_all, fields(rows = dataset.len()))]
pub fn write_json<W: Write>(dataset: &Dataset, mut out: W) -> Result<()> {
    let records: Vec<JsonRow> = dataset
        .rows
        .iter()
        .map(|row| JsonRow::new(dataset, row))
        .collect();
    serde_json::to_writer_pretty(&mut out, &records)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Single-batch Parquet file at `path`.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn write_parquet<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let batch = to_record_batch(dataset)?;
    let file = File::create(path.as_ref())?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatedRow;
    use arrow::array::{Array, StringArray};
    use arrow::csv::ReaderBuilder;
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use serde_json::Value;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn sample() -> Dataset {
        Dataset {
            semester_columns: vec!["jaro 2020".into(), "podzim 2020".into()],
            rows: vec![
                DatedRow {
                    program: "B1101 Matematika".into(),
                    obor: "Statistika, analýza".into(),
                    date: "2020-09-01".into(),
                    cells: vec![Some("12".into()), None],
                },
                DatedRow {
                    program: "N1701 \"Fyzika\"".into(),
                    obor: "Fyzika".into(),
                    date: "2021-03-01".into(),
                    cells: vec![None, Some("3".into())],
                },
            ],
        }
    }

    fn cell(batch: &RecordBatch, col: usize, row: usize) -> String {
        let arr = batch
            .column(col)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("utf8 column");
        if arr.is_null(row) {
            String::new()
        } else {
            arr.value(row).to_string()
        }
    }

    fn assert_same(ds: &Dataset, batch: &RecordBatch) {
        let columns = ds.columns();
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, columns);
        assert_eq!(batch.num_rows(), ds.len());
        for (r, row) in ds.rows.iter().enumerate() {
            for (c, name) in columns.iter().enumerate() {
                assert_eq!(
                    cell(batch, c, r),
                    ds.get(row, name).unwrap_or(""),
                    "row {r} column {name}"
                );
            }
        }
    }

    #[test]
    fn csv_header_and_empty_cells() -> anyhow::Result<()> {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf)?;
        let text = String::from_utf8(buf)?;
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("program,obor,date,jaro 2020,podzim 2020")
        );
        assert_eq!(
            lines.next(),
            Some("B1101 Matematika,\"Statistika, analýza\",2020-09-01,12,")
        );
        assert!(!text.contains("None"));
        assert!(!text.contains("NaN"));
        Ok(())
    }

    #[test]
    fn csv_round_trip() -> anyhow::Result<()> {
        let ds = sample();
        let mut buf = Vec::new();
        write_csv(&ds, &mut buf)?;

        let schema = crate::dataset::build_arrow_schema(&ds);
        let mut reader = ReaderBuilder::new(schema)
            .with_header(true)
            .build(Cursor::new(buf))?;
        let batch = reader.next().expect("one batch")?;
        assert!(reader.next().is_none());
        assert_same(&ds, &batch);
        Ok(())
    }

    #[test]
    fn parquet_round_trip() -> anyhow::Result<()> {
        let ds = sample();
        let dir = tempdir()?;
        let path = dir.path().join("stats.parquet");
        write_parquet(&ds, &path)?;

        let file = File::open(&path)?;
        let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
        let batch = reader.next().expect("one batch")?;
        assert_same(&ds, &batch);
        Ok(())
    }

    #[test]
    fn json_uses_null_for_absent_cells() -> anyhow::Result<()> {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf)?;
        let parsed: Value = serde_json::from_slice(&buf)?;
        let rows = parsed.as_array().expect("array");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["jaro 2020"], Value::String("12".into()));
        assert_eq!(rows[0]["podzim 2020"], Value::Null);
        assert_eq!(rows[1]["date"], Value::String("2021-03-01".into()));
        assert_eq!(rows[1]["program"], Value::String("N1701 \"Fyzika\"".into()));
        assert_eq!(rows[1]["jaro 2020"], Value::Null);
        assert_eq!(rows[1]["podzim 2020"], Value::String("3".into()));
        Ok(())
    }
}
