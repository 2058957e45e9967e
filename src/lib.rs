pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::bigquery::BigQueryWarehouse;
pub use adapters::storage::{GcsStorage, LocalStorage};
pub use config::{CliConfig, PipelineOptions, RunnerKind};
pub use crate::core::{etl::EtlEngine, graph::build_ranking_graph, runner::DirectRunner};
pub use utils::error::{EtlError, Result};
