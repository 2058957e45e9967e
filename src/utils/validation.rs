use crate::utils::error::{EtlError, Result};
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

const GCS_URL: &str = r"^[gG][sS]://(?P<bucket>[a-z0-9\-\._]+)(/(?P<key>.*))?$";
const PROJECT_ID: &str = r"^[A-Za-z0-9][A-Za-z0-9\-_\.:]*$";

fn gcs_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(GCS_URL).expect("GCS_URL is a valid pattern"))
}

fn project_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PROJECT_ID).expect("PROJECT_ID is a valid pattern"))
}

/// Splits a `gs://bucket/key` URL into its bucket and (possibly empty) key.
pub fn parse_gcs_url(url: &str) -> Option<(&str, &str)> {
    let caps = gcs_url_regex().captures(url)?;
    let bucket = caps.name("bucket")?.as_str();
    let key = caps.name("key").map(|m| m.as_str()).unwrap_or("");
    Some((bucket, key))
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    // Object storage locations must name a bucket.
    if path.to_ascii_lowercase().starts_with("gs://") && parse_gcs_url(path).is_none() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Expected gs://<bucket>[/<prefix>]".to_string(),
        });
    }

    Ok(())
}

/// Load jobs read their files from Cloud Storage, so this location has to be
/// a bucket URL rather than a local path.
pub fn validate_gcs_location(field_name: &str, location: &str) -> Result<()> {
    validate_path(field_name, location)?;
    if parse_gcs_url(location).is_none() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: location.to_string(),
            reason: "Expected gs://<bucket>[/<prefix>]".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_project_id(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if !project_id_regex().is_match(value) {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Project id may only contain letters, digits, '-', '_', '.' and ':'"
                .to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("stagingLocation", "gs://bucket/staging").is_ok());
        assert!(validate_path("stagingLocation", "gs://bucket").is_ok());
        assert!(validate_path("tempLocation", "/tmp/beam").is_ok());
        assert!(validate_path("tempLocation", "   ").is_err());
        assert!(validate_path("tempLocation", "gs://").is_err());
        assert!(validate_path("tempLocation", "gs://Bad Bucket/x").is_err());
    }

    #[test]
    fn test_validate_gcs_location() {
        assert!(validate_gcs_location("tempLocation", "gs://bucket/temp").is_ok());
        assert!(validate_gcs_location("tempLocation", "gs://bucket").is_ok());
        assert!(validate_gcs_location("tempLocation", "/tmp/beam").is_err());
        assert!(validate_gcs_location("tempLocation", "s3://bucket/temp").is_err());
        assert!(validate_gcs_location("tempLocation", "").is_err());
    }

    #[test]
    fn test_parse_gcs_url() {
        assert_eq!(
            parse_gcs_url("gs://dataflow-bucket/dir/file.parquet"),
            Some(("dataflow-bucket", "dir/file.parquet"))
        );
        assert_eq!(parse_gcs_url("gs://dataflow-bucket"), Some(("dataflow-bucket", "")));
        assert_eq!(parse_gcs_url("s3://bucket/key"), None);
    }

    #[test]
    fn test_validate_project_id() {
        assert!(validate_project_id("project", "my-project-123").is_ok());
        assert!(validate_project_id("project", "example.com:my-project").is_ok());
        assert!(validate_project_id("project", "").is_err());
        assert!(validate_project_id("project", "has space").is_err());
    }
}
