//! Named field groups and known field identifiers for each [`DataType`].

use crate::error::WeatherEtlError;
use crate::types::data_type::DataType;
use crate::types::record_set::KEY_COLUMNS;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

const HISTORICAL_FIELDS: [&str; 27] = [
    "provisionalFlag", "cldCvr", "dewPt", "feelsLike", "heatIndex", "mslPres", "precip",
    "presTend", "radSolar", "relHum", "sfcPres", "snowfall", "spcHum", "temp", "vis", "wetBulb",
    "windChill", "windDir", "windDir80m", "windDir100m", "windSpd", "windSpd80m", "windSpd100m",
    "freezingRainFlag", "icePelletsFlag", "rainFlag", "snowFlag",
];

const FORECAST_FIELDS: [&str; 23] = [
    "timestampInit", "cldCvr", "dewPt", "feelsLike", "heatIndex", "mslPres", "precip",
    "precipProb", "radSolar", "relHum", "sfcPres", "snowfall", "snowfallProb", "spcHum", "temp",
    "wetBulb", "windChill", "windDir", "windDir80m", "windDir100m", "windSpd", "windSpd80m",
    "windSpd100m",
];

const ALL_TEMP: [&str; 6] = ["temp", "feelsLike", "heatIndex", "windChill", "dewPt", "wetBulb"];
const ALL_WIND: [&str; 6] = [
    "windSpd", "windDir", "windSpd80m", "windDir80m", "windSpd100m", "windDir100m",
];
const ALL_HUM: [&str; 3] = ["relHum", "spcHum", "dewPt"];
const ALL_RAD: [&str; 1] = ["radSolar"];
const ALL_CLD_CVR: [&str; 1] = ["cldCvr"];

/// Group requested when the caller gives no selection at all.
pub const DEFAULT_FIELD_GROUP: &str = "popular";

/// Immutable lookup of field groups, built once and shared by reference.
///
/// # Examples
///
/// ```
/// use weathersource_etl::{DataType, FieldCatalog};
///
/// let catalog = FieldCatalog::weather_source();
/// let fields = catalog.resolve(DataType::Historical, "temp, precip,temp").unwrap();
/// assert_eq!(fields, ["temp", "precip"]);
/// ```
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    groups: HashMap<DataType, HashMap<&'static str, Vec<&'static str>>>,
    known_fields: HashMap<DataType, HashSet<&'static str>>,
}

impl FieldCatalog {
    /// The catalog of the Weather Source OnPoint history and forecast APIs.
    pub fn weather_source() -> Self {
        let historical = HashMap::from([
            ("popular", vec!["temp", "precip", "relHum", "snowfall"]),
            ("allTemp", ALL_TEMP.to_vec()),
            ("allWind", ALL_WIND.to_vec()),
            (
                "allPrecip",
                vec!["precip", "snowfall", "rainFlag", "snowFlag", "freezingRainFlag", "icePelletsFlag"],
            ),
            ("allHum", ALL_HUM.to_vec()),
            ("allPres", vec!["mslPres", "sfcPres", "presTend"]),
            ("allRad", ALL_RAD.to_vec()),
            ("allCldCvr", ALL_CLD_CVR.to_vec()),
            ("all", HISTORICAL_FIELDS.to_vec()),
        ]);
        let forecast = HashMap::from([
            (
                "popular",
                vec!["timestampInit", "temp", "precip", "precipProb", "snowfall", "snowfallProb"],
            ),
            ("allTemp", ALL_TEMP.to_vec()),
            ("allWind", ALL_WIND.to_vec()),
            ("allPrecip", vec!["precip", "precipProb", "snowfall", "snowfallProb"]),
            ("allHum", ALL_HUM.to_vec()),
            ("allPres", vec!["mslPres", "sfcPres"]),
            ("allRad", ALL_RAD.to_vec()),
            ("allCldCvr", ALL_CLD_CVR.to_vec()),
            ("all", FORECAST_FIELDS.to_vec()),
        ]);

        Self {
            groups: HashMap::from([
                (DataType::Historical, historical),
                (DataType::Forecast, forecast),
            ]),
            known_fields: HashMap::from([
                (DataType::Historical, HISTORICAL_FIELDS.into_iter().collect()),
                (DataType::Forecast, FORECAST_FIELDS.into_iter().collect()),
            ]),
        }
    }

    /// Field list of a named group, if `name` is a group for `data_type`.
    pub fn group(&self, data_type: DataType, name: &str) -> Option<&[&'static str]> {
        self.groups
            .get(&data_type)
            .and_then(|groups| groups.get(name))
            .map(Vec::as_slice)
    }

    pub fn is_known_field(&self, data_type: DataType, field: &str) -> bool {
        self.known_fields
            .get(&data_type)
            .is_some_and(|fields| fields.contains(field))
    }

    /// Resolves a selection into the ordered list of field identifiers to request.
    ///
    /// A group name yields the group's fields. Anything else is read as a
    /// comma separated list: entries are trimmed, empty entries and key column
    /// names are dropped, and duplicates are removed keeping the first
    /// occurrence. Unknown field names pass through with a warning so the
    /// provider gets the final say.
    ///
    /// # Errors
    ///
    /// [`WeatherEtlError::UnknownFieldGroup`] when nothing is left to request.
    pub fn resolve(
        &self,
        data_type: DataType,
        selection: &str,
    ) -> Result<Vec<String>, WeatherEtlError> {
        if let Some(group) = self.group(data_type, selection.trim()) {
            debug!("Resolved {} group '{}' to {:?}", data_type, selection.trim(), group);
            return Ok(group.iter().map(|field| field.to_string()).collect());
        }

        let mut seen = HashSet::new();
        let mut fields = Vec::new();
        for field in selection.split(',').map(str::trim) {
            if field.is_empty() || !seen.insert(field) {
                continue;
            }
            if KEY_COLUMNS.contains(&field) {
                warn!("'{}' is always included and is not requested as a field", field);
                continue;
            }
            if !self.is_known_field(data_type, field) {
                warn!("'{}' is not a known {} field, passing it through", field, data_type);
            }
            fields.push(field.to_string());
        }

        if fields.is_empty() {
            return Err(WeatherEtlError::UnknownFieldGroup {
                data_type,
                selection: selection.to_string(),
            });
        }
        Ok(fields)
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::weather_source()
    }
}
