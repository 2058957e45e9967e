//! Parquet decoding into JSON-shaped records.

use crate::domain::model::Record;
use crate::utils::error::Result;
use arrow::json::ArrayWriter;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

/// Reads every row group of an in-memory Parquet file.
///
/// Columns become JSON values through arrow's JSON writer: integers stay
/// numbers, strings stay strings, and null cells are left out of the record.
pub fn decode_records(data: Bytes) -> Result<Vec<Record>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)?.build()?;

    let mut writer = ArrayWriter::new(Vec::new());
    let mut rows = 0usize;
    for batch in reader {
        let batch = batch?;
        rows += batch.num_rows();
        writer.write(&batch)?;
    }
    writer.finish()?;

    let buffer = writer.into_inner();
    if rows == 0 || buffer.is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<Record> = serde_json::from_slice(&buffer)?;
    tracing::debug!("Decoded {} rows from Parquet", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use serde_json::json;
    use std::sync::Arc;

    fn parquet_bytes(types: Vec<Option<&str>>, ranks: Vec<i64>) -> Bytes {
        let schema = Arc::new(Schema::new(vec![
            Field::new("type", DataType::Utf8, true),
            Field::new("rank", DataType::Int64, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(types)),
            Arc::new(Int64Array::from(ranks)),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        Bytes::from(buffer)
    }

    #[test]
    fn test_decode_records() {
        let data = parquet_bytes(vec![Some("Apartment"), Some("HOUSE")], vec![1, 2]);
        let records = decode_records(data).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("type"), Some(&json!("Apartment")));
        assert_eq!(records[0].get("rank"), Some(&json!(1)));
        assert_eq!(records[1].get("type"), Some(&json!("HOUSE")));
    }

    #[test]
    fn test_null_cells_are_omitted() {
        let data = parquet_bytes(vec![None], vec![9]);
        let records = decode_records(data).unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].get("type").is_none());
        assert_eq!(records[0].get("rank"), Some(&json!(9)));
    }

    #[test]
    fn test_empty_file_has_no_records() {
        let data = parquet_bytes(vec![], vec![]);
        assert!(decode_records(data).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_bytes_fail() {
        let result = decode_records(Bytes::from_static(b"definitely not parquet"));
        assert!(result.is_err());
    }
}
