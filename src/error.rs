use crate::api::error::ApiError;
use crate::parser::error::ParseError;
use crate::storage::error::StorageError;
use crate::types::data_type::DataType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherEtlError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No {data_type} fields requested (selection '{selection}' resolves to nothing)")]
    UnknownFieldGroup {
        data_type: DataType,
        selection: String,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
