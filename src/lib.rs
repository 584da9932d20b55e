//! Fetches hourly historical and forecast weather for a geographic point from
//! the Weather Source OnPoint API, flattens it into a Polars frame and stores
//! it as parquet or csv on local disk or in an S3-compatible bucket.

mod api;
mod config;
mod error;
mod fields;
mod parser;
mod pipeline;
mod storage;
mod types;

#[cfg(test)]
mod test_utils;

pub use error::WeatherEtlError;
pub use pipeline::*;

pub use config::{ObjectStoreConfig, PipelineConfig};

pub use api::client::{RawResponse, WeatherApi, WeatherSourceClient};
pub use fields::catalog::{FieldCatalog, DEFAULT_FIELD_GROUP};
pub use parser::parse;

pub use storage::local::LocalStorage;
pub use storage::naming::StorageTarget;
pub use storage::object_storage::ObjectStoreStorage;
pub use storage::StorageBackend;

pub use types::data_type::DataType;
pub use types::date_range::DateRange;
pub use types::file_format::FileFormat;
pub use types::into_utc_trait::IntoUtcDateTime;
pub use types::location::Location;
pub use types::record_set::{
    ProviderLocation, RecordSet, KEY_COLUMNS, LATITUDE_COLUMN, LONGITUDE_COLUMN, TIMESTAMP_COLUMN,
};

pub use api::error::ApiError;
pub use parser::error::ParseError;
pub use storage::error::StorageError;
