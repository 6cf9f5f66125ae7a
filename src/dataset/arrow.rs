// src/dataset/arrow.rs

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

use super::Dataset;
use crate::error::Result;

/// Every column is nullable Utf8: counts are kept as rendered by the source.
pub fn build_arrow_schema(dataset: &Dataset) -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = dataset
        .columns()
        .into_iter()
        .map(|name| ArrowField::new(name, DataType::Utf8, /* nullable = */ true))
        .collect();

    Arc::new(ArrowSchema::new(fields))
}

/// Columnar copy of the dataset, in [`Dataset::columns`] order.
pub fn to_record_batch(dataset: &Dataset) -> Result<RecordBatch> {
    let schema = build_arrow_schema(dataset);
    let rows = &dataset.rows;

    let mut cols: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    cols.push(Arc::new(StringArray::from_iter_values(
        rows.iter().map(|r| r.program.as_str()),
    )));
    cols.push(Arc::new(StringArray::from_iter_values(
        rows.iter().map(|r| r.obor.as_str()),
    )));
    cols.push(Arc::new(StringArray::from_iter_values(
        rows.iter().map(|r| r.date.as_str()),
    )));
    for i in 0..dataset.semester_columns.len() {
        let arr: StringArray = rows
            .iter()
            .map(|r| r.cells.get(i).and_then(|c| c.as_deref()))
            .collect();
        cols.push(Arc::new(arr));
    }

    Ok(RecordBatch::try_new(schema, cols)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatedRow;
    use arrow::array::Array;

    #[test]
    fn batch_keeps_absent_cells_null() -> anyhow::Result<()> {
        let ds = Dataset {
            semester_columns: vec!["s1".into(), "s2".into()],
            rows: vec![DatedRow {
                program: "P".into(),
                obor: "O".into(),
                date: "2020-09-01".into(),
                cells: vec![Some("7".into()), None],
            }],
        };
        let batch = to_record_batch(&ds)?;
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), 5);
        assert_eq!(batch.schema().field(3).name(), "s1");

        let s2 = batch
            .column(4)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("utf8 column");
        assert!(s2.is_null(0));
        Ok(())
    }

    #[test]
    fn short_cell_vector_reads_as_null() -> anyhow::Result<()> {
        let ds = Dataset {
            semester_columns: vec!["s1".into(), "s2".into()],
            rows: vec![DatedRow {
                program: "P".into(),
                obor: "O".into(),
                date: "2020-09-01".into(),
                cells: vec![Some("7".into())],
            }],
        };
        let batch = to_record_batch(&ds)?;
        assert_eq!(batch.num_columns(), 5);
        assert!(batch.column(4).is_null(0));
        Ok(())
    }
}
