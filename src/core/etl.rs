use crate::config::PipelineOptions;
use crate::core::graph::PipelineGraph;
use crate::domain::model::PipelineResult;
use crate::domain::ports::Runner;
use crate::utils::error::Result;

/// Hands a pipeline graph to a runner and waits for the terminal result.
pub struct EtlEngine<R: Runner> {
    runner: R,
}

impl<R: Runner> EtlEngine<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub async fn run(
        &self,
        graph: &PipelineGraph,
        options: &PipelineOptions,
    ) -> Result<PipelineResult> {
        tracing::info!(
            "🚀 Submitting job {} to {} (project: {}, region: {})",
            options.job_name,
            options.runner,
            options.project,
            options.region
        );
        tracing::debug!(
            "Load files staged under {} (staging location {} is not used by {})",
            options.temp_location,
            options.staging_location,
            options.runner
        );

        let result = self.runner.run(graph, options).await?;

        tracing::info!(
            "🏁 Job {} done: {} read, {} landed in {}, {} written to {}",
            result.job_name,
            result.records_read,
            result.landing_rows,
            graph.landing.table,
            result.transformed_rows,
            graph.transformed.table
        );
        Ok(result)
    }
}
