//! The main entry point: resolve fields, fetch, parse and store weather data
//! for one point and date range.

use crate::api::client::{WeatherApi, WeatherSourceClient};
use crate::config::PipelineConfig;
use crate::error::WeatherEtlError;
use crate::fields::catalog::{FieldCatalog, DEFAULT_FIELD_GROUP};
use crate::parser::parse;
use crate::storage::local::LocalStorage;
use crate::storage::naming::StorageTarget;
use crate::storage::object_storage::ObjectStoreStorage;
use crate::storage::StorageBackend;
use crate::types::data_type::DataType;
use crate::types::date_range::DateRange;
use crate::types::file_format::FileFormat;
use crate::types::location::Location;
use crate::types::record_set::RecordSet;
use bon::bon;
use log::{debug, info, warn};
use std::sync::Arc;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedData {
    location: String,
    row_count: usize,
}

impl ProcessedData {
    /// Where the file was written: an absolute path or an `s3://` URI.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// True when the provider returned no data points. The file is still
    /// written, holding only the column schema.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// Orchestrates one fetch-parse-store run per call.
///
/// Every stage fails fast: the first error is returned unchanged and nothing
/// is stored.
///
/// # Examples
///
/// ```no_run
/// use weathersource_etl::{FileFormat, LocalStorage, WeatherEtlError, WeatherPipeline, WeatherSourceClient};
///
/// # fn main() -> Result<(), WeatherEtlError> {
/// let client = WeatherSourceClient::builder().api_key("my-key").build()?;
/// let pipeline = WeatherPipeline::builder()
///     .api(Box::new(client))
///     .storage(Box::new(LocalStorage::new("data")))
///     .build();
///
/// let result = pipeline
///     .process_historical_data()
///     .latitude(40.7128)
///     .longitude(-74.0060)
///     .start_date("2023-12-01")
///     .end_date("2023-12-07")
///     .fields("temp,precip")
///     .file_format(FileFormat::Csv)
///     .call()?;
/// println!("{} rows written to {}", result.row_count(), result.location());
/// # Ok(())
/// # }
/// ```
pub struct WeatherPipeline {
    catalog: Arc<FieldCatalog>,
    api: Box<dyn WeatherApi>,
    storage: Box<dyn StorageBackend>,
    max_days_per_request: Option<u32>,
}

#[bon]
impl WeatherPipeline {
    /// Assembles a pipeline from its parts.
    ///
    /// The catalog defaults to [`FieldCatalog::weather_source`]. Without
    /// `max_days_per_request` every run issues exactly one request.
    #[builder]
    pub fn new(
        api: Box<dyn WeatherApi>,
        storage: Box<dyn StorageBackend>,
        catalog: Option<Arc<FieldCatalog>>,
        max_days_per_request: Option<u32>,
    ) -> Self {
        Self {
            catalog: catalog.unwrap_or_else(|| Arc::new(FieldCatalog::weather_source())),
            api,
            storage,
            max_days_per_request,
        }
    }

    /// Builds the HTTP client and the storage backend selected by
    /// `use_object_store`.
    ///
    /// # Errors
    ///
    /// [`WeatherEtlError::InvalidInput`] for an empty API key, or when the
    /// object store is selected without an `object_store` section. Client and
    /// object store setup failures are returned as their own errors.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, WeatherEtlError> {
        if config.api_key.trim().is_empty() {
            return Err(WeatherEtlError::InvalidInput(
                "api_key must not be empty".to_string(),
            ));
        }
        let client = WeatherSourceClient::builder()
            .api_key(&config.api_key)
            .maybe_historical_base_url(config.historical_base_url.clone())
            .maybe_forecast_base_url(config.forecast_base_url.clone())
            .maybe_timeout(config.timeout())
            .build()?;

        let storage: Box<dyn StorageBackend> = if config.use_object_store {
            let store_config = config.object_store.as_ref().ok_or_else(|| {
                WeatherEtlError::InvalidInput(
                    "use_object_store is set but no object_store section is configured"
                        .to_string(),
                )
            })?;
            info!("Storing results in bucket '{}'", store_config.bucket);
            Box::new(ObjectStoreStorage::from_config(store_config)?)
        } else {
            info!("Storing results in {:?}", config.output_dir);
            Box::new(LocalStorage::new(config.output_dir.clone()))
        };

        Ok(Self::builder()
            .api(Box::new(client))
            .storage(storage)
            .maybe_max_days_per_request(config.max_days_per_request)
            .build())
    }

    /// Fetches observed hourly weather and stores it.
    ///
    /// # Arguments
    ///
    /// * `.latitude(f64)` / `.longitude(f64)`: **Required.** The point.
    /// * `.start_date(&str)` / `.end_date(&str)`: **Required.** Inclusive
    ///   `YYYY-MM-DD` dates.
    /// * `.fields(&str)`: Optional. A group name such as `allTemp`, or a
    ///   comma separated field list. Defaults to the `popular` group.
    /// * `.file_format(FileFormat)`: Optional. Defaults to parquet.
    ///
    /// # Errors
    ///
    /// [`WeatherEtlError::InvalidInput`] and
    /// [`WeatherEtlError::UnknownFieldGroup`] are raised before any request
    /// is made. API, parse and storage failures follow in that order.
    #[builder]
    pub fn process_historical_data(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: &str,
        end_date: &str,
        fields: Option<&str>,
        file_format: Option<FileFormat>,
    ) -> Result<ProcessedData, WeatherEtlError> {
        let location = Location::new(latitude, longitude)?;
        let date_range = DateRange::parse(start_date, end_date)?;
        self.process(
            DataType::Historical,
            location,
            date_range,
            fields,
            file_format.unwrap_or_default(),
        )
    }

    /// Fetches hourly forecasts and stores them. Takes the same arguments as
    /// [`Self::process_historical_data`].
    #[builder]
    pub fn process_forecast_data(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: &str,
        end_date: &str,
        fields: Option<&str>,
        file_format: Option<FileFormat>,
    ) -> Result<ProcessedData, WeatherEtlError> {
        let location = Location::new(latitude, longitude)?;
        let date_range = DateRange::parse(start_date, end_date)?;
        self.process(
            DataType::Forecast,
            location,
            date_range,
            fields,
            file_format.unwrap_or_default(),
        )
    }
}

impl WeatherPipeline {
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// The backend results are written to.
    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    fn process(
        &self,
        data_type: DataType,
        location: Location,
        date_range: DateRange,
        fields: Option<&str>,
        format: FileFormat,
    ) -> Result<ProcessedData, WeatherEtlError> {
        let selection = fields.unwrap_or(DEFAULT_FIELD_GROUP);
        let fields = self.catalog.resolve(data_type, selection)?;
        info!(
            "Processing {} data for {} from {} to {} ({} fields)",
            data_type,
            location,
            date_range.start(),
            date_range.end(),
            fields.len()
        );

        let records = self.fetch_records(data_type, location, date_range, &fields)?;
        if records.is_empty() {
            warn!(
                "No {} data points for {} between {} and {}",
                data_type,
                location,
                date_range.start(),
                date_range.end()
            );
        }

        let target = StorageTarget::new(data_type, location, date_range, format);
        let stored_at = self.storage.store(&records, &target)?;
        Ok(ProcessedData {
            location: stored_at,
            row_count: records.row_count(),
        })
    }

    fn fetch_records(
        &self,
        data_type: DataType,
        location: Location,
        date_range: DateRange,
        fields: &[String],
    ) -> Result<RecordSet, WeatherEtlError> {
        let ranges = match self.max_days_per_request {
            Some(max_days) => date_range.split(max_days),
            None => vec![date_range],
        };
        if ranges.len() > 1 {
            debug!("Splitting request into {} chunks", ranges.len());
        }

        let mut combined: Option<RecordSet> = None;
        for range in &ranges {
            let raw = self.api.fetch(&location, range, data_type, fields)?;
            let records = parse(&raw, fields, data_type, location)?;
            combined = Some(match combined {
                Some(previous) => previous.append(records)?,
                None => records,
            });
        }
        combined.ok_or_else(|| {
            WeatherEtlError::InvalidInput(format!("date range {:?} covers no days", date_range))
        })
    }
}
