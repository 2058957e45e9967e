use crate::config::PipelineOptions;
use crate::core::graph::PipelineGraph;
use crate::domain::model::{PipelineResult, Record, TableSink};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait Warehouse: Send + Sync {
    /// Writes `records` to the sink's table under its dispositions and returns
    /// the number of rows the warehouse reports as written.
    fn write_table(
        &self,
        sink: &TableSink,
        job_id: &str,
        records: &[Record],
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn project(&self) -> &str;
    /// Prefix under which warehouse load files are staged.
    fn temp_location(&self) -> &str;
    fn job_name(&self) -> &str;
}

/// Executes a pipeline graph to a terminal state.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn run(&self, graph: &PipelineGraph, options: &PipelineOptions)
        -> Result<PipelineResult>;
}
