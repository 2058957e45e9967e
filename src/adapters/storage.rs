use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::parse_gcs_url;
use bytes::Bytes;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use std::path::{Path, PathBuf};

/// Reads and writes `gs://bucket/key` objects in one Google Cloud Storage
/// bucket.
///
/// Credentials come from the usual Google Cloud environment
/// (`GOOGLE_APPLICATION_CREDENTIALS`, gcloud application-default
/// credentials, or the metadata server).
#[derive(Debug)]
pub struct GcsStorage {
    bucket: String,
    store: GoogleCloudStorage,
}

impl GcsStorage {
    pub fn for_url(url: &str) -> Result<Self> {
        let (bucket, _) = parse_gcs_url(url).ok_or_else(|| EtlError::ConfigError {
            message: format!("Not a gs:// URL: {}", url),
        })?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()?;

        Ok(Self {
            bucket: bucket.to_string(),
            store,
        })
    }

    fn object_path<'a>(&self, url: &'a str) -> Option<&'a str> {
        let (bucket, key) = parse_gcs_url(url)?;
        (bucket == self.bucket).then_some(key)
    }
}

impl Storage for GcsStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let key = self.object_path(path).ok_or_else(|| EtlError::SourceError {
            path: path.to_string(),
            message: format!("not an object in gs://{}", self.bucket),
        })?;

        tracing::debug!("Reading {}", path);
        let location = ObjectPath::from(key);
        let object = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => EtlError::SourceError {
                path: path.to_string(),
                message: e.to_string(),
            },
            other => EtlError::ObjectStoreError(other),
        })?;

        let data = object.bytes().await?;
        tracing::debug!("Read {} bytes from {}", data.len(), path);
        Ok(data.to_vec())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let key = self.object_path(path).ok_or_else(|| EtlError::ConfigError {
            message: format!("{} is not an object in gs://{}", path, self.bucket),
        })?;

        let payload = PutPayload::from(Bytes::copy_from_slice(data));
        self.store.put(&ObjectPath::from(key), payload).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), path);
        Ok(())
    }
}

/// Serves object paths from a local directory: `gs://bucket/key` resolves to
/// `<base>/bucket/key`, anything else to `<base>/<path>`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        match parse_gcs_url(path) {
            Some((bucket, key)) => self.base_path.join(bucket).join(key),
            None => self.base_path.join(Path::new(path.trim_start_matches('/'))),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {} from {}", path, full_path.display());

        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(EtlError::SourceError {
                path: path.to_string(),
                message: format!("{} does not exist", full_path.display()),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_resolve_maps_bucket_to_directory() {
        let storage = LocalStorage::new("/data");
        assert_eq!(
            storage.resolve("gs://bucket/dir/file.parquet"),
            PathBuf::from("/data/bucket/dir/file.parquet")
        );
        assert_eq!(
            storage.resolve("/plain/file.parquet"),
            PathBuf::from("/data/plain/file.parquet")
        );
    }

    #[tokio::test]
    async fn test_local_read_file() {
        let temp_dir = TempDir::new().unwrap();
        let bucket_dir = temp_dir.path().join("bucket");
        std::fs::create_dir_all(&bucket_dir).unwrap();
        std::fs::write(bucket_dir.join("input.parquet"), b"payload").unwrap();

        let storage = LocalStorage::new(temp_dir.path());
        let data = storage.read_file("gs://bucket/input.parquet").await.unwrap();
        assert_eq!(data, b"payload");
    }

    #[tokio::test]
    async fn test_local_missing_file_is_source_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let err = storage
            .read_file("gs://bucket/missing.parquet")
            .await
            .unwrap_err();
        assert!(matches!(err, EtlError::SourceError { .. }));
    }

    #[tokio::test]
    async fn test_local_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage
            .write_file("gs://bucket/temp/my-pipeline-1-landing.json", b"{}\n")
            .await
            .unwrap();

        let written = temp_dir.path().join("bucket/temp/my-pipeline-1-landing.json");
        assert_eq!(std::fs::read(written).unwrap(), b"{}\n");
        assert_eq!(
            storage
                .read_file("gs://bucket/temp/my-pipeline-1-landing.json")
                .await
                .unwrap(),
            b"{}\n"
        );
    }

    #[test]
    fn test_gcs_storage_rejects_non_gcs_url() {
        let err = GcsStorage::for_url("s3://bucket/key").unwrap_err();
        assert!(matches!(err, EtlError::ConfigError { .. }));
    }
}
