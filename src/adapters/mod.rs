// Adapters layer: concrete implementations for external systems (object storage, Parquet, BigQuery).

pub mod bigquery;
pub mod parquet;
pub mod storage;
