use crate::error::WeatherEtlError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Serialization used when persisting a [`crate::RecordSet`].
///
/// The format never changes the column schema, only how it is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Columnar binary (Apache Parquet, snappy compressed).
    #[default]
    Parquet,
    /// Comma separated text with a header row.
    Csv,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Parquet => "parquet",
            FileFormat::Csv => "csv",
        }
    }

    pub(crate) fn content_type(&self) -> &'static str {
        match self {
            FileFormat::Parquet => "application/vnd.apache.parquet",
            FileFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = WeatherEtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parquet" => Ok(FileFormat::Parquet),
            "csv" => Ok(FileFormat::Csv),
            other => Err(WeatherEtlError::InvalidInput(format!(
                "unsupported file format '{}', expected 'parquet' or 'csv'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("parquet".parse::<FileFormat>().unwrap(), FileFormat::Parquet);
        assert_eq!("CSV".parse::<FileFormat>().unwrap(), FileFormat::Csv);
    }

    #[test]
    fn rejects_other_formats() {
        assert!(matches!(
            "json".parse::<FileFormat>(),
            Err(WeatherEtlError::InvalidInput(_))
        ));
    }
}
