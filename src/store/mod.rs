//! Upload and persistence services the pipeline hands its results to.
//!
//! The pipeline only shapes payloads; where files and records end up is
//! decided by the [`Uploader`] and [`RecordStore`] implementations.

mod directory;
mod memory;
mod records;

pub use directory::DirectoryUploader;
pub use memory::{MemoryRecordStore, MemoryUploader};
pub use records::JsonRecordStore;

use crate::error::Result;
use crate::files::{SignatureFile, SignatureRecord};

/// Stores an uploaded file and returns its unique storage name.
pub trait Uploader {
    fn upload(&mut self, file: &SignatureFile) -> Result<String>;

    /// Delete a file this uploader stored earlier.
    fn remove(&mut self, stored_name: &str) -> Result<()>;
}

/// Creates or updates signature records.
pub trait RecordStore {
    fn save(&mut self, record: &SignatureRecord) -> Result<()>;
}

/// Make a file name safe to use as a single path component.
pub(crate) fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        "signature".to_string()
    } else {
        trimmed.to_string()
    }
}
