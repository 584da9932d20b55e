pub mod data_type;
pub mod date_range;
pub mod file_format;
pub mod into_utc_trait;
pub mod location;
pub mod record_set;
