//! S3-compatible object store backend.

use crate::config::ObjectStoreConfig;
use crate::storage::encode::encode;
use crate::storage::error::StorageError;
use crate::storage::naming::StorageTarget;
use crate::storage::StorageBackend;
use crate::types::record_set::RecordSet;
use futures_util::TryStreamExt;
use log::{debug, info};
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, ObjectMeta, ObjectStore, PutOptions, PutPayload, RetryConfig,
};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Uploads files as objects named `{prefix}/{file_name}` in one bucket.
///
/// The object store API is async; each call is driven to completion on a
/// private current-thread runtime, so callers stay synchronous.
pub struct ObjectStoreStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    prefix: Option<String>,
    runtime: Runtime,
}

impl std::fmt::Debug for ObjectStoreStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreStorage")
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl ObjectStoreStorage {
    /// Connects to an S3 (or MinIO) bucket using only the given settings.
    ///
    /// Failed requests are not retried; the first error is returned.
    pub fn from_config(config: &ObjectStoreConfig) -> Result<Self, StorageError> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_retry(RetryConfig {
                max_retries: 0,
                ..Default::default()
            });
        if let Some(region) = &config.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        if let Some(access_key_id) = &config.access_key_id {
            builder = builder.with_access_key_id(access_key_id);
        }
        if let Some(secret_access_key) = &config.secret_access_key {
            builder = builder.with_secret_access_key(secret_access_key);
        }
        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder.build().map_err(|e| StorageError::ObjectStoreSetup {
            bucket: config.bucket.clone(),
            source: e,
        })?;
        Self::with_store(Arc::new(store), &config.bucket, config.prefix.clone())
    }

    /// Uses an existing store, e.g. `object_store::memory::InMemory`.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: &str,
        prefix: Option<String>,
    ) -> Result<Self, StorageError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StorageError::Runtime)?;
        let prefix = prefix
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty());
        Ok(Self {
            store,
            bucket: bucket.to_string(),
            prefix,
            runtime,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn object_path(&self, target: &StorageTarget) -> Path {
        match &self.prefix {
            Some(prefix) => Path::from(format!("{}/{}", prefix, target.file_name())),
            None => Path::from(target.file_name()),
        }
    }

    pub fn uri(&self, target: &StorageTarget) -> String {
        format!("s3://{}/{}", self.bucket, self.object_path(target))
    }

    /// Object keys below the configured prefix whose file name starts with
    /// `name_prefix`, e.g. `"historical_"`. An empty `name_prefix` lists all.
    pub fn list(&self, name_prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = self.prefix.as_deref().map(Path::from);
        let listed: Vec<ObjectMeta> = self
            .block_on(self.store.list(prefix.as_ref()).try_collect())
            .map_err(|e| StorageError::Lookup {
                uri: format!(
                    "s3://{}/{}",
                    self.bucket,
                    self.prefix.as_deref().unwrap_or_default()
                ),
                source: e,
            })?;

        let keys: Vec<String> = listed
            .into_iter()
            .filter(|meta| {
                meta.location
                    .filename()
                    .is_some_and(|name| name.starts_with(name_prefix))
            })
            .map(|meta| meta.location.to_string())
            .collect();
        debug!("Listed {} objects in bucket '{}'", keys.len(), self.bucket);
        Ok(keys)
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl StorageBackend for ObjectStoreStorage {
    fn store(&self, records: &RecordSet, target: &StorageTarget) -> Result<String, StorageError> {
        let path = self.object_path(target);
        let uri = self.uri(target);
        let bytes = encode(records, target.format)?;
        debug!("Uploading {} bytes to {}", bytes.len(), uri);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, target.format.content_type().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };
        self.block_on(
            self.store
                .put_opts(&path, PutPayload::from(bytes), options),
        )
        .map_err(|e| StorageError::Upload {
            uri: uri.clone(),
            source: e,
        })?;

        info!("Stored {} rows at {}", records.row_count(), uri);
        Ok(uri)
    }

    fn exists(&self, target: &StorageTarget) -> Result<bool, StorageError> {
        let path = self.object_path(target);
        match self.block_on(self.store.head(&path)) {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::Lookup {
                uri: self.uri(target),
                source: e,
            }),
        }
    }
}
