//! Contains the `RecordSet`, the tabular result of parsing one provider response.

use crate::parser::error::ParseError;
use crate::types::data_type::DataType;
use polars::frame::DataFrame;
use polars::prelude::{DataType as ColumnType, PlSmallStr};
use serde::Deserialize;

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";

/// Columns present in every record set ahead of the requested fields.
pub const KEY_COLUMNS: [&str; 3] = [TIMESTAMP_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN];

/// Descriptive metadata the provider returns alongside the values.
///
/// Kept on the [`RecordSet`] rather than as columns so the column schema is
/// always exactly the key columns plus the requested fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub elevation: Option<f64>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
}

/// Normalized weather values for one location: one row per timestamp.
///
/// The underlying frame has the columns `timestamp` (UTC, millisecond
/// datetime), `latitude`, `longitude`, followed by one column per requested
/// field in request order. Every column is present even when the provider
/// omitted a field; the missing values are nulls.
///
/// A record set is produced once by [`crate::parse`] and only read afterwards.
#[derive(Debug, Clone)]
pub struct RecordSet {
    frame: DataFrame,
    data_type: DataType,
    fields: Vec<String>,
    provider_location: Option<ProviderLocation>,
}

impl RecordSet {
    pub(crate) fn new(
        frame: DataFrame,
        data_type: DataType,
        fields: Vec<String>,
        provider_location: Option<ProviderLocation>,
    ) -> Self {
        Self {
            frame,
            data_type,
            fields,
            provider_location,
        }
    }

    /// The underlying Polars frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The requested field columns, excluding the key columns.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn provider_location(&self) -> Option<&ProviderLocation> {
        self.provider_location.as_ref()
    }

    /// All column names, key columns first.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Appends `other` below `self`, keeping the row order of both.
    ///
    /// Both sets must share the data type and field list. When a column's
    /// type differs and one side holds no values for it, that side takes the
    /// other side's type. Only columns with values of different kinds on both
    /// sides are widened to text.
    pub fn append(self, other: RecordSet) -> Result<RecordSet, ParseError> {
        if self.data_type != other.data_type || self.fields != other.fields {
            return Err(ParseError::SchemaMismatch {
                expected: self.column_names(),
                found: other.column_names(),
            });
        }

        let mut top = self.frame;
        let mut bottom = other.frame;
        let names: Vec<PlSmallStr> = top.get_column_names().into_iter().cloned().collect();
        for name in names {
            let top_type = top.column(name.as_str())?.dtype().clone();
            let bottom_type = bottom.column(name.as_str())?.dtype().clone();
            if top_type == bottom_type {
                continue;
            }
            if is_all_null(&top, name.as_str())? {
                let cast = top.column(name.as_str())?.cast(&bottom_type)?;
                top.with_column(cast)?;
            } else if is_all_null(&bottom, name.as_str())? {
                let cast = bottom.column(name.as_str())?.cast(&top_type)?;
                bottom.with_column(cast)?;
            } else {
                let widened = top.column(name.as_str())?.cast(&ColumnType::String)?;
                top.with_column(widened)?;
                let widened = bottom.column(name.as_str())?.cast(&ColumnType::String)?;
                bottom.with_column(widened)?;
            }
        }
        top.vstack_mut(&bottom)?;

        Ok(RecordSet {
            frame: top,
            data_type: self.data_type,
            fields: self.fields,
            provider_location: self.provider_location.or(other.provider_location),
        })
    }
}

fn is_all_null(frame: &DataFrame, name: &str) -> Result<bool, ParseError> {
    Ok(frame.column(name)?.null_count() == frame.height())
}
