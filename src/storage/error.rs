use crate::types::file_format::FileFormat;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to check for '{0}'")]
    PathLookup(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode records as {format}")]
    Encode {
        format: FileFormat,
        #[source]
        source: PolarsError,
    },

    #[error("Upload to {uri} failed")]
    Upload {
        uri: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Failed to check for {uri}")]
    Lookup {
        uri: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Failed to configure object store for bucket '{bucket}'")]
    ObjectStoreSetup {
        bucket: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Failed to start the object store runtime")]
    Runtime(#[source] std::io::Error),
}
