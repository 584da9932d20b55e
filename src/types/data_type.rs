//! Defines the category of weather data being requested and the per-category
//! details the client and parser depend on.

use crate::error::WeatherEtlError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The kind of weather data to retrieve for a point.
///
/// Each variant has its own provider endpoint, field catalog and values
/// container in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Observed (reanalysed) hourly weather for past dates.
    Historical,
    /// Hourly forecast values for upcoming dates.
    Forecast,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Historical => "historical",
            DataType::Forecast => "forecast",
        }
    }

    /// Name of the array property holding one entry per timestamp.
    pub(crate) fn values_container(&self) -> &'static str {
        match self {
            DataType::Historical => "history",
            DataType::Forecast => "forecast",
        }
    }

    pub(crate) fn default_base_url(&self) -> &'static str {
        match self {
            DataType::Historical => "https://history.weathersourceapis.com/v2",
            DataType::Forecast => "https://forecast.weathersourceapis.com/v2",
        }
    }
}

/// Formats a `DataType` as used in output file names.
///
/// # Examples
///
/// ```
/// use weathersource_etl::DataType;
///
/// assert_eq!(DataType::Historical.to_string(), "historical");
/// assert_eq!(format!("{}", DataType::Forecast), "forecast");
/// ```
impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = WeatherEtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "historical" => Ok(DataType::Historical),
            "forecast" => Ok(DataType::Forecast),
            other => Err(WeatherEtlError::InvalidInput(format!(
                "unknown data type '{}', expected 'historical' or 'forecast'",
                other
            ))),
        }
    }
}
