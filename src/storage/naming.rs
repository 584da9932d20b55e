use crate::types::data_type::DataType;
use crate::types::date_range::DateRange;
use crate::types::file_format::FileFormat;
use crate::types::location::Location;

/// Everything that decides where a record set is written.
///
/// Identical targets always produce the identical file name, so repeated
/// runs overwrite rather than accumulate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageTarget {
    pub data_type: DataType,
    pub location: Location,
    pub date_range: DateRange,
    pub format: FileFormat,
}

impl StorageTarget {
    pub fn new(
        data_type: DataType,
        location: Location,
        date_range: DateRange,
        format: FileFormat,
    ) -> Self {
        Self {
            data_type,
            location,
            date_range,
            format,
        }
    }

    /// `{data_type}_{lat}_{lon}_{start}_{end}.{ext}`, e.g.
    /// `historical_40.7128_-74.006_2023-12-01_2023-12-07.parquet`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}.{}",
            self.data_type.as_str(),
            format_coordinate(self.location.latitude()),
            format_coordinate(self.location.longitude()),
            self.date_range.start().format("%Y-%m-%d"),
            self.date_range.end().format("%Y-%m-%d"),
            self.format.extension()
        )
    }
}

// Four decimals (about 11 m), trailing zeros trimmed.
fn format_coordinate(value: f64) -> String {
    let fixed = format!("{:.4}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(lat: f64, lon: f64, format: FileFormat) -> StorageTarget {
        StorageTarget::new(
            DataType::Historical,
            Location::new(lat, lon).unwrap(),
            DateRange::parse("2023-12-01", "2023-12-07").unwrap(),
            format,
        )
    }

    #[test]
    fn file_name_follows_convention() {
        assert_eq!(
            target(40.7128, -74.0060, FileFormat::Parquet).file_name(),
            "historical_40.7128_-74.006_2023-12-01_2023-12-07.parquet"
        );
        assert_eq!(
            target(40.7128, -74.0060, FileFormat::Csv).file_name(),
            "historical_40.7128_-74.006_2023-12-01_2023-12-07.csv"
        );
    }

    #[test]
    fn forecast_prefix() {
        let target = StorageTarget::new(
            DataType::Forecast,
            Location::new(51.5, -0.12).unwrap(),
            DateRange::parse("2023-12-15", "2023-12-20").unwrap(),
            FileFormat::Parquet,
        );
        assert_eq!(
            target.file_name(),
            "forecast_51.5_-0.12_2023-12-15_2023-12-20.parquet"
        );
    }

    #[test]
    fn coordinates_are_rounded_and_trimmed() {
        assert_eq!(format_coordinate(40.712_849), "40.7128");
        assert_eq!(format_coordinate(10.0), "10");
        assert_eq!(format_coordinate(-0.000_01), "0");
        assert_eq!(format_coordinate(-180.0), "-180");
    }
}
