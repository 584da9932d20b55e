//! Already-resolved settings for building a [`crate::WeatherPipeline`].
//!
//! Nothing here reads the environment; callers load values however they like
//! (files, env vars, flags) and deserialize or construct these structs.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_OUTPUT_DIR: &str = "data";

/// Where and how the pipeline fetches and stores data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub api_key: String,
    /// Overrides the public history endpoint.
    pub historical_base_url: Option<String>,
    /// Overrides the public forecast endpoint.
    pub forecast_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Target directory of the local backend.
    pub output_dir: PathBuf,
    /// Store in the object store instead of `output_dir`.
    pub use_object_store: bool,
    pub object_store: Option<ObjectStoreConfig>,
    /// Split longer ranges into several requests. Unset means one request.
    pub max_days_per_request: Option<u32>,
}

impl PipelineConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            historical_base_url: None,
            forecast_base_url: None,
            timeout_secs: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            use_object_store: false,
            object_store: None,
            max_days_per_request: None,
        }
    }
}

/// Connection settings of an S3-compatible bucket.
///
/// Only these values are used; the environment is never consulted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectStoreConfig {
    pub bucket: String,
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint, e.g. a MinIO server.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub allow_http: bool,
    /// Key prefix objects are written under.
    #[serde(default)]
    pub prefix: Option<String>,
}

impl ObjectStoreConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: None,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            allow_http: false,
            prefix: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let config: PipelineConfig = serde_json::from_str(r#"{"api_key": "abc"}"#)?;
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.output_dir, PathBuf::from("data"));
        assert!(!config.use_object_store);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.max_days_per_request, None);
        Ok(())
    }

    #[test]
    fn reads_object_store_section() -> Result<(), Box<dyn std::error::Error>> {
        let config: PipelineConfig = serde_json::from_str(
            r#"{
                "api_key": "abc",
                "timeout_secs": 10,
                "use_object_store": true,
                "max_days_per_request": 31,
                "object_store": {
                    "bucket": "weather",
                    "endpoint": "http://localhost:9000",
                    "allow_http": true,
                    "prefix": "raw"
                }
            }"#,
        )?;
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.max_days_per_request, Some(31));
        let store = config.object_store.unwrap();
        assert_eq!(store.bucket, "weather");
        assert_eq!(store.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(store.allow_http);
        assert_eq!(store.prefix.as_deref(), Some("raw"));
        assert_eq!(store.region, None);
        Ok(())
    }
}
