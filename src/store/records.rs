//! JSON file record store.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SigtrimError};
use crate::files::SignatureRecord;

use super::RecordStore;

/// Appends records to a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records saved so far. A missing file means no records.
    pub fn load(&self) -> Result<Vec<SignatureRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| SigtrimError::Io {
            path: self.path.clone(),
            message: format!("Failed to read records: {}", e),
        })?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| SigtrimError::Config {
            message: format!("Invalid record file {}: {}", self.path.display(), e),
            help: Some("The record file must be a JSON array of {text, image} objects".to_string()),
        })
    }
}

impl RecordStore for JsonRecordStore {
    fn save(&mut self, record: &SignatureRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&records).map_err(|e| SigtrimError::Io {
            path: self.path.clone(),
            message: format!("Failed to serialize records: {}", e),
        })?;

        fs::write(&self.path, json + "\n").map_err(|e| SigtrimError::Io {
            path: self.path.clone(),
            message: format!("Failed to write records: {}", e),
        })?;

        log::info!("saved record for {} to {}", record.image, self.path.display());
        Ok(())
    }
}
