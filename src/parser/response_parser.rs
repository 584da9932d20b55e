//! Flattens a provider response into a [`RecordSet`].

use crate::api::client::RawResponse;
use crate::parser::columns::field_column;
use crate::parser::error::ParseError;
use crate::types::data_type::DataType;
use crate::types::into_utc_trait::parse_utc_timestamp;
use crate::types::location::Location;
use crate::types::record_set::{
    ProviderLocation, RecordSet, LATITUDE_COLUMN, LONGITUDE_COLUMN, TIMESTAMP_COLUMN,
};
use log::{debug, info, warn};
use polars::frame::DataFrame;
use polars::prelude::{Column, DataType as ColumnType, NamedFrom, Series, TimeUnit};
use serde_json::Value;

/// Parses a raw response into one row per timestamp.
///
/// Rows keep the order the provider returned them in. Timestamps are
/// converted to UTC. Every field in `expected_fields` becomes a column, in
/// that order, even when no entry carries it. The `latitude`/`longitude`
/// columns use the response's `location` block and fall back to `requested`.
///
/// # Errors
///
/// * [`ParseError::InvalidJson`] if the body is not JSON.
/// * [`ParseError::MissingValues`] if the data type's values array
///   (`history` or `forecast`) is absent or not an array.
/// * [`ParseError::MalformedEntry`], [`ParseError::MissingTimestamp`],
///   [`ParseError::InvalidTimestamp`] for entries that cannot become a row.
///
/// An empty values array is not an error: the result has zero rows and the
/// full column schema.
pub fn parse(
    raw: &RawResponse,
    expected_fields: &[String],
    data_type: DataType,
    requested: Location,
) -> Result<RecordSet, ParseError> {
    let body: Value = serde_json::from_str(&raw.body).map_err(|e| ParseError::InvalidJson {
        url: raw.url.clone(),
        source: e,
    })?;

    let container = data_type.values_container();
    let entries = body
        .get(container)
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::MissingValues {
            container: container.to_string(),
        })?;

    let provider_location = body.get("location").and_then(|location| {
        serde_json::from_value::<ProviderLocation>(location.clone())
            .map_err(|e| warn!("Ignoring unreadable location block in {}: {}", raw.url, e))
            .ok()
    });
    let latitude = provider_location
        .as_ref()
        .and_then(|l| l.latitude)
        .unwrap_or(requested.latitude());
    let longitude = provider_location
        .as_ref()
        .and_then(|l| l.longitude)
        .unwrap_or(requested.longitude());

    let mut timestamps = Vec::with_capacity(entries.len());
    let mut values: Vec<Vec<Option<&Value>>> =
        vec![Vec::with_capacity(entries.len()); expected_fields.len()];

    for (index, entry) in entries.iter().enumerate() {
        let row = entry.as_object().ok_or_else(|| ParseError::MalformedEntry {
            container: container.to_string(),
            index,
        })?;
        let raw_timestamp = row
            .get(TIMESTAMP_COLUMN)
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingTimestamp { index })?;
        let timestamp =
            parse_utc_timestamp(raw_timestamp).map_err(|e| ParseError::InvalidTimestamp {
                index,
                value: raw_timestamp.to_string(),
                source: e,
            })?;
        timestamps.push(timestamp.timestamp_millis());

        for (field, column) in expected_fields.iter().zip(values.iter_mut()) {
            column.push(row.get(field).filter(|value| !value.is_null()));
        }
    }

    let height = timestamps.len();
    let mut columns: Vec<Column> = Vec::with_capacity(expected_fields.len() + 3);
    columns.push(Column::from(
        Series::new(TIMESTAMP_COLUMN.into(), timestamps)
            .cast(&ColumnType::Datetime(TimeUnit::Milliseconds, None))?,
    ));
    columns.push(Column::from(Series::new(
        LATITUDE_COLUMN.into(),
        vec![latitude; height],
    )));
    columns.push(Column::from(Series::new(
        LONGITUDE_COLUMN.into(),
        vec![longitude; height],
    )));
    for (field, column_values) in expected_fields.iter().zip(values.iter()) {
        let column = field_column(field, column_values);
        debug!("Column '{}' parsed as {}", field, column.dtype());
        columns.push(column);
    }

    let frame = DataFrame::new(columns)?;
    if frame.height() == 0 {
        warn!("Response from {} holds no '{}' entries", raw.url, container);
    } else {
        info!("Parsed {} {} rows from {}", frame.height(), data_type, raw.url);
    }

    Ok(RecordSet::new(
        frame,
        data_type,
        expected_fields.to_vec(),
        provider_location,
    ))
}
