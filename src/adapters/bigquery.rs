//! BigQuery warehouse backed by load jobs.
//!
//! Every table write stages the records as newline-delimited JSON under the
//! temp location and then runs one load job over that file, carrying the
//! table schema and the sink's create/write dispositions. Creating,
//! appending to, and truncating the table are all performed by BigQuery as
//! part of the job.

use crate::domain::model::{FieldType, Record, TableSchema, TableSink};
use crate::domain::ports::{ConfigProvider, Storage, Warehouse};
use crate::utils::error::{EtlError, Result};
use gcp_bigquery_client::model::error_proto::ErrorProto;
use gcp_bigquery_client::model::job::Job;
use gcp_bigquery_client::model::job_configuration::JobConfiguration;
use gcp_bigquery_client::model::job_configuration_load::JobConfigurationLoad;
use gcp_bigquery_client::model::job_reference::JobReference;
use gcp_bigquery_client::model::table_field_schema::TableFieldSchema;
use gcp_bigquery_client::model::table_reference::TableReference;
use gcp_bigquery_client::model::table_schema::TableSchema as LoadSchema;
use gcp_bigquery_client::Client;
use std::time::Duration;

const SOURCE_FORMAT: &str = "NEWLINE_DELIMITED_JSON";
const LOAD_FILE_DIR: &str = "bq_load";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct BigQueryWarehouse<S: Storage> {
    client: Client,
    staging: S,
    project: String,
    temp_location: String,
    poll_interval: Duration,
}

impl<S: Storage> BigQueryWarehouse<S> {
    /// Runs load jobs in the configured project; `staging` must be able to
    /// write under the configured temp location.
    pub fn new(client: Client, staging: S, config: &impl ConfigProvider) -> Self {
        Self {
            client,
            staging,
            project: config.project().to_string(),
            temp_location: config.temp_location().to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl<S: Storage> Warehouse for BigQueryWarehouse<S> {
    async fn write_table(&self, sink: &TableSink, job_id: &str, records: &[Record]) -> Result<u64> {
        let source_uri = stage_records(&self.staging, &self.temp_location, job_id, records)
            .await
            .map_err(|e| EtlError::WarehouseError {
                table: sink.table.to_string(),
                message: format!("staging load file for {} failed: {}", job_id, e),
            })?;

        tracing::debug!("Submitting load job {} for {}", job_id, sink.table);
        let mut job = self
            .client
            .job()
            .insert(&self.project, load_job(&self.project, sink, job_id, &source_uri))
            .await?;

        // Status calls must name the location BigQuery picked for the job.
        let location = job_location(&job).map(str::to_string);

        let rows = loop {
            if let Some(rows) = load_outcome(sink, &job, records.len())? {
                break rows;
            }

            tracing::debug!("Load job {} is still running", job_id);
            tokio::time::sleep(self.poll_interval).await;
            job = self
                .client
                .job()
                .get_job(&self.project, job_id, location.as_deref())
                .await?;
        };

        tracing::info!("📥 Load job {} wrote {} rows to {}", job_id, rows, sink.table);
        Ok(rows)
    }
}

/// Object URI of the load file for `job_id` under `temp_location`.
pub fn staging_uri(temp_location: &str, job_id: &str) -> String {
    format!(
        "{}/{}/{}.json",
        temp_location.trim_end_matches('/'),
        LOAD_FILE_DIR,
        job_id
    )
}

/// Writes `records` as newline-delimited JSON under `temp_location` and
/// returns the URI a load job should read.
pub async fn stage_records<S: Storage>(
    storage: &S,
    temp_location: &str,
    job_id: &str,
    records: &[Record],
) -> Result<String> {
    let uri = staging_uri(temp_location, job_id);
    storage.write_file(&uri, &newline_delimited(records)?).await?;
    tracing::debug!("Staged {} records at {}", records.len(), uri);
    Ok(uri)
}

fn newline_delimited(records: &[Record]) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    for record in records {
        serde_json::to_writer(&mut payload, record)?;
        payload.push(b'\n');
    }
    Ok(payload)
}

fn load_schema(schema: &TableSchema) -> LoadSchema {
    let fields = schema
        .fields
        .iter()
        .map(|field| match field.field_type {
            FieldType::String => TableFieldSchema::string(&field.name),
            FieldType::Integer => TableFieldSchema::integer(&field.name),
        })
        .collect();
    LoadSchema::new(fields)
}

/// Load job reading `source_uri` into the sink's table.
///
/// The job reference carries no location: BigQuery runs the job where the
/// destination dataset lives.
pub fn load_job(project: &str, sink: &TableSink, job_id: &str, source_uri: &str) -> Job {
    let load = JobConfigurationLoad {
        source_uris: Some(vec![source_uri.to_string()]),
        destination_table: Some(TableReference::new(
            &sink.table.project_id,
            &sink.table.dataset_id,
            &sink.table.table_id,
        )),
        schema: Some(load_schema(&sink.schema)),
        source_format: Some(SOURCE_FORMAT.to_string()),
        create_disposition: Some(sink.create_disposition.as_str().to_string()),
        write_disposition: Some(sink.write_disposition.as_str().to_string()),
        ..Default::default()
    };

    Job {
        job_reference: Some(JobReference {
            project_id: Some(project.to_string()),
            job_id: Some(job_id.to_string()),
            ..Default::default()
        }),
        configuration: Some(JobConfiguration {
            load: Some(load),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Location BigQuery assigned to a submitted job.
pub fn job_location(job: &Job) -> Option<&str> {
    job.job_reference.as_ref()?.location.as_deref()
}

/// Rows written once the job is `DONE`, `None` while it is still pending or
/// running. A finished job with an error result fails the write.
pub fn load_outcome(sink: &TableSink, job: &Job, staged: usize) -> Result<Option<u64>> {
    let status = job.status.as_ref().ok_or_else(|| EtlError::WarehouseError {
        table: sink.table.to_string(),
        message: "load job returned no status".to_string(),
    })?;

    if status.state.as_deref() != Some("DONE") {
        return Ok(None);
    }

    if let Some(error) = &status.error_result {
        let details: Vec<String> = status.errors.iter().flatten().map(describe).collect();
        return Err(EtlError::WarehouseError {
            table: sink.table.to_string(),
            message: if details.is_empty() {
                format!("load job failed: {}", describe(error))
            } else {
                format!("load job failed: {} ({})", describe(error), details.join("; "))
            },
        });
    }

    let rows = job
        .statistics
        .as_ref()
        .and_then(|s| s.load.as_ref())
        .and_then(|l| l.output_rows.as_deref())
        .and_then(|r| r.parse::<u64>().ok())
        .unwrap_or(staged as u64);
    Ok(Some(rows))
}

fn describe(error: &ErrorProto) -> String {
    format!(
        "{}: {}",
        error.reason.as_deref().unwrap_or("error"),
        error.message.as_deref().unwrap_or("no message")
    )
}
