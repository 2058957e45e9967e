use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("BigQuery request failed: {0}")]
    BigQueryError(#[from] gcp_bigquery_client::error::BQError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported runner: {runner}")]
    UnsupportedRunner { runner: String },

    #[error("Source read failed for {path}: {message}")]
    SourceError { path: String, message: String },

    #[error("Record {index} rejected: {message}")]
    RecordError { index: usize, message: String },

    #[error("Write to {table} failed: {message}")]
    WarehouseError { table: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Record,
    Sink,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::UnsupportedRunner { .. } => ErrorCategory::Configuration,
            EtlError::SourceError { .. }
            | EtlError::ParquetError(_)
            | EtlError::ArrowError(_)
            | EtlError::ObjectStoreError(_) => ErrorCategory::Source,
            EtlError::RecordError { .. } => ErrorCategory::Record,
            EtlError::WarehouseError { .. }
            | EtlError::BigQueryError(_)
            | EtlError::SerializationError(_) => ErrorCategory::Sink,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Record => ErrorSeverity::High,
            ErrorCategory::Source | ErrorCategory::Sink => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for this failure. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags (--project, --region, --stagingLocation, --tempLocation, --runner)"
            }
            ErrorCategory::Source => {
                "Check that the source Parquet object exists, is readable, and is a valid Parquet file"
            }
            ErrorCategory::Record => {
                "Inspect the source data: every record needs a string-valued `type` field"
            }
            ErrorCategory::Sink => {
                "Check warehouse permissions, quota, and that the target datasets exist"
            }
            ErrorCategory::System => "Check local disk and network access, then rerun the pipeline",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid pipeline configuration: {}", self),
            ErrorCategory::Source => format!("Could not read the source file: {}", self),
            ErrorCategory::Record => format!("A source record could not be transformed: {}", self),
            ErrorCategory::Sink => format!("Writing to the warehouse failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_exits_non_zero() {
        let errors = vec![
            EtlError::UnsupportedRunner {
                runner: "DataflowRunner".to_string(),
            },
            EtlError::SourceError {
                path: "gs://bucket/file.parquet".to_string(),
                message: "not found".to_string(),
            },
            EtlError::RecordError {
                index: 3,
                message: "missing field `type`".to_string(),
            },
            EtlError::WarehouseError {
                table: "p:land.t".to_string(),
                message: "quota exceeded".to_string(),
            },
            EtlError::IoError(std::io::Error::other("disk full")),
        ];

        for error in errors {
            assert_ne!(error.exit_code(), 0, "{error} should exit non-zero");
        }
    }

    #[test]
    fn test_categories() {
        let record = EtlError::RecordError {
            index: 0,
            message: "bad".to_string(),
        };
        assert_eq!(record.category(), ErrorCategory::Record);
        assert!(record.user_friendly_message().contains("Record 0 rejected"));

        let config = EtlError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(config.category(), ErrorCategory::Configuration);
        assert_eq!(config.severity(), ErrorSeverity::High);
    }
}
