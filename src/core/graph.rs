use crate::domain::model::{CreateDisposition, TableRef, TableSink, WriteDisposition};
use crate::domain::schema::ranking_schema;

pub const SOURCE_PATH: &str =
    "gs://dataflow-digible-poc-123/apartments__get_listings_rank-2022-10-11T11-01-30.parquet";

pub const LANDING_DATASET: &str = "land";
pub const LANDING_TABLE: &str = "apts_dot_com_ranking_landing";
pub const TRANSFORMED_DATASET: &str = "transformed";
pub const TRANSFORMED_TABLE: &str = "apts_dot_com_ranking_transformed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParquetSource {
    pub path: String,
}

/// One Parquet source forked into two sinks: the raw records go to `landing`,
/// the `type`-normalized records go to `transformed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineGraph {
    pub source: ParquetSource,
    pub landing: TableSink,
    pub transformed: TableSink,
}

pub fn build_ranking_graph(project: &str) -> PipelineGraph {
    build_graph_from(SOURCE_PATH, project)
}

pub fn build_graph_from(source_path: &str, project: &str) -> PipelineGraph {
    PipelineGraph {
        source: ParquetSource {
            path: source_path.to_string(),
        },
        landing: TableSink {
            label: "landing".to_string(),
            table: TableRef::new(project, LANDING_DATASET, LANDING_TABLE),
            schema: ranking_schema(),
            create_disposition: CreateDisposition::CreateIfNeeded,
            write_disposition: WriteDisposition::WriteAppend,
        },
        transformed: TableSink {
            label: "transformed".to_string(),
            table: TableRef::new(project, TRANSFORMED_DATASET, TRANSFORMED_TABLE),
            schema: ranking_schema(),
            create_disposition: CreateDisposition::CreateIfNeeded,
            write_disposition: WriteDisposition::WriteTruncate,
        },
    }
}
