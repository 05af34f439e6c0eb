//! Line-delimited JSON record files

use crate::error::StoreError;
use folio_domain::{ChunkRecord, DomainError, PageRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Read every record of a JSONL file; blank lines are skipped
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    read_records(path, |_: &T| Ok(()))
}

fn read_records<T, F>(path: &Path, validate: F) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Result<(), DomainError>,
{
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let reader = BufReader::new(fs::File::open(path)?);

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            reason: e.to_string(),
        })?;
        validate(&record).map_err(|source| StoreError::InvalidRecord {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Write records one per line, replacing the file and creating parent directories
pub fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(fs::File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read and validate a page record file
pub fn read_pages(path: &Path) -> Result<Vec<PageRecord>, StoreError> {
    read_records(path, PageRecord::validate)
}

/// Read and validate a chunk record file
pub fn read_chunks(path: &Path) -> Result<Vec<ChunkRecord>, StoreError> {
    read_records(path, ChunkRecord::validate)
}
