use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_gcs_location, validate_non_empty_string, validate_path, validate_project_id,
    Validate,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::fmt;
use std::str::FromStr;

/// Prefix of every generated job name; the rest is a nanosecond timestamp.
pub const JOB_NAME_PREFIX: &str = "my-pipeline-";

#[derive(Debug, Clone, Parser)]
#[command(name = "apts-ranking-etl")]
#[command(about = "Load the apartments.com ranking Parquet export into BigQuery")]
pub struct CliConfig {
    #[arg(long, help = "Specify Google Cloud project")]
    pub project: String,

    #[arg(long, help = "Specify Google Cloud region")]
    pub region: String,

    #[arg(
        long = "stagingLocation",
        help = "Specify Cloud Storage bucket for staging"
    )]
    pub staging_location: String,

    #[arg(long = "tempLocation", help = "Specify Cloud Storage bucket for temp")]
    pub temp_location: String,

    #[arg(long, help = "Specify the pipeline runner")]
    pub runner: String,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_project_id("project", &self.project)?;
        validate_non_empty_string("region", &self.region)?;
        validate_path("stagingLocation", &self.staging_location)?;
        validate_gcs_location("tempLocation", &self.temp_location)?;

        // Only the in-process runner can execute the graph.
        let runner = self.runner.parse::<RunnerKind>()?;
        if runner != RunnerKind::Direct {
            return Err(EtlError::UnsupportedRunner {
                runner: runner.to_string(),
            });
        }

        tracing::debug!("✅ Command line configuration validation passed");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerKind {
    Direct,
    Dataflow,
}

impl FromStr for RunnerKind {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directrunner" | "direct" => Ok(RunnerKind::Direct),
            "dataflowrunner" | "dataflow" => Ok(RunnerKind::Dataflow),
            _ => Err(EtlError::InvalidConfigValueError {
                field: "runner".to_string(),
                value: s.to_string(),
                reason: "Known runners: DirectRunner, DataflowRunner".to_string(),
            }),
        }
    }
}

impl fmt::Display for RunnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerKind::Direct => write!(f, "DirectRunner"),
            RunnerKind::Dataflow => write!(f, "DataflowRunner"),
        }
    }
}

/// Resolved runtime options. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub project: String,
    pub region: String,
    pub staging_location: String,
    pub temp_location: String,
    pub runner: RunnerKind,
    pub job_name: String,
}

impl PipelineOptions {
    /// Validates the command line and stamps a fresh job name.
    pub fn resolve(config: CliConfig) -> Result<Self> {
        Self::resolve_at(config, Utc::now())
    }

    pub fn resolve_at(config: CliConfig, now: DateTime<Utc>) -> Result<Self> {
        config.validate()?;
        let runner = config.runner.parse()?;

        Ok(Self {
            project: config.project,
            region: config.region,
            staging_location: config.staging_location,
            temp_location: config.temp_location,
            runner,
            job_name: job_name_at(now),
        })
    }
}

/// Best-effort unique job name: the prefix plus nanoseconds since the epoch.
/// Two runs in the same nanosecond, or a clock stepped backwards, can collide.
pub fn job_name_at(now: DateTime<Utc>) -> String {
    let nanos = now.timestamp_nanos_opt().unwrap_or(i64::MAX);
    format!("{}{}", JOB_NAME_PREFIX, nanos)
}

impl ConfigProvider for PipelineOptions {
    fn project(&self) -> &str {
        &self.project
    }

    fn temp_location(&self) -> &str {
        &self.temp_location
    }

    fn job_name(&self) -> &str {
        &self.job_name
    }
}
