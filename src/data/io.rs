//! CSV read/write helpers
//!
//! Writers create missing parent directories so outputs can target
//! `data/processed/...` or `reports/...` on a fresh checkout.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::error::Result;

/// Read every row of a headed CSV file
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write rows with a header line, creating parent directories as needed
pub fn write_csv<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::debug!(rows = rows.len(), path = %path.display(), "Wrote CSV");
    Ok(())
}

/// Create the parent directory of `path` if it has one
pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
