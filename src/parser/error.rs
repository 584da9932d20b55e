use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Response body from {url} is not valid JSON")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response has no '{container}' array")]
    MissingValues { container: String },

    #[error("Entry {index} in '{container}' is not an object")]
    MalformedEntry { container: String, index: usize },

    #[error("Entry {index} has no 'timestamp'")]
    MissingTimestamp { index: usize },

    #[error("Entry {index} has an unparseable timestamp '{value}'")]
    InvalidTimestamp {
        index: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Record sets do not share a schema: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed building the record frame: {0}")]
    Frame(#[from] PolarsError),
}
