use crate::storage::encode::encode;
use crate::storage::error::StorageError;
use crate::storage::naming::StorageTarget;
use crate::storage::StorageBackend;
use crate::types::record_set::RecordSet;
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes files into a directory on the local filesystem.
///
/// Files are written to a temporary sibling first and renamed into place, so
/// a failed write never leaves a partial file under the final name.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    output_dir: PathBuf,
}

impl LocalStorage {
    /// The directory is created on the first write if it does not exist.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, target: &StorageTarget) -> PathBuf {
        self.output_dir.join(target.file_name())
    }
}

impl StorageBackend for LocalStorage {
    fn store(&self, records: &RecordSet, target: &StorageTarget) -> Result<String, StorageError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| StorageError::DirCreation(self.output_dir.clone(), e))?;
        let path = self.path_for(target);

        let bytes = encode(records, target.format)?;
        let mut temp_file = NamedTempFile::new_in(&self.output_dir)
            .map_err(|e| StorageError::Write(path.clone(), e))?;
        temp_file
            .write_all(&bytes)
            .map_err(|e| StorageError::Write(path.clone(), e))?;
        temp_file
            .flush()
            .map_err(|e| StorageError::Write(path.clone(), e))?;
        temp_file
            .persist(&path)
            .map_err(|e| StorageError::Write(path.clone(), e.error))?;
        debug!("Wrote {} bytes to {:?}", bytes.len(), path);

        let path = path
            .canonicalize()
            .map_err(|e| StorageError::Write(path.clone(), e))?;
        info!("Stored {} rows at {}", records.row_count(), path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    fn exists(&self, target: &StorageTarget) -> Result<bool, StorageError> {
        let path = self.path_for(target);
        path.try_exists()
            .map_err(|e| StorageError::PathLookup(path.clone(), e))
    }
}
