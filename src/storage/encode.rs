use crate::storage::error::StorageError;
use crate::types::file_format::FileFormat;
use crate::types::record_set::RecordSet;
use polars::prelude::{CsvWriter, ParquetCompression, ParquetWriter, SerWriter};

/// UTC timestamps in text output carry an explicit `Z`.
const CSV_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Serializes a record set into the bytes of one file of the given format.
pub(crate) fn encode(records: &RecordSet, format: FileFormat) -> Result<Vec<u8>, StorageError> {
    // Both writers take `&mut DataFrame`.
    let mut frame = records.frame().clone();
    let mut buffer = Vec::new();
    let written = match format {
        FileFormat::Parquet => ParquetWriter::new(&mut buffer)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut frame)
            .map(|_| ()),
        FileFormat::Csv => CsvWriter::new(&mut buffer)
            .include_header(true)
            .with_datetime_format(Some(CSV_DATETIME_FORMAT.to_string()))
            .finish(&mut frame),
    };
    written.map_err(|e| StorageError::Encode { format, source: e })?;
    Ok(buffer)
}
