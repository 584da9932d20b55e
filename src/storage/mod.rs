//! Persisting record sets to local disk or an object store.

mod encode;
pub mod error;
pub mod local;
pub mod naming;
pub mod object_storage;

use crate::storage::error::StorageError;
use crate::storage::naming::StorageTarget;
use crate::types::record_set::RecordSet;

/// A destination for record sets.
///
/// Implementations derive the destination name from the [`StorageTarget`]
/// alone, overwrite an existing file of the same name and return a location
/// string the caller can use to find the written data.
pub trait StorageBackend: Send + Sync {
    /// Encodes and writes `records`, returning the final location.
    fn store(&self, records: &RecordSet, target: &StorageTarget) -> Result<String, StorageError>;

    /// Whether a file for `target` has already been written.
    fn exists(&self, target: &StorageTarget) -> Result<bool, StorageError>;
}
