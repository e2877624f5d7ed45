//! In-memory services for dry runs.

use crate::error::Result;
use crate::files::{SignatureFile, SignatureRecord};

use super::{sanitize_name, RecordStore, Uploader};

/// Keeps uploaded files in memory, named `<index>-<name>`.
#[derive(Debug, Default)]
pub struct MemoryUploader {
    files: Vec<(String, SignatureFile)>,
    next: usize,
}

impl MemoryUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploaded files with their storage names, oldest first.
    pub fn files(&self) -> &[(String, SignatureFile)] {
        &self.files
    }

    pub fn get(&self, stored_name: &str) -> Option<&SignatureFile> {
        self.files
            .iter()
            .find(|(name, _)| name == stored_name)
            .map(|(_, file)| file)
    }
}

impl Uploader for MemoryUploader {
    fn upload(&mut self, file: &SignatureFile) -> Result<String> {
        let stored = format!("{:04}-{}", self.next, sanitize_name(&file.name));
        self.next += 1;
        self.files.push((stored.clone(), file.clone()));
        Ok(stored)
    }

    fn remove(&mut self, stored_name: &str) -> Result<()> {
        self.files.retain(|(name, _)| name != stored_name);
        Ok(())
    }
}

/// Keeps saved records in memory.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Vec<SignatureRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SignatureRecord] {
        &self.records
    }
}

impl RecordStore for MemoryRecordStore {
    fn save(&mut self, record: &SignatureRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
