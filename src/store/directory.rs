//! Uploader that writes files into a local directory.

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, SigtrimError};
use crate::files::SignatureFile;

use super::{sanitize_name, Uploader};

/// Stores each upload as `<unix-millis>-<name>` inside a directory.
///
/// Names never overwrite an existing file; a counter is inserted on
/// collision.
#[derive(Debug, Clone)]
pub struct DirectoryUploader {
    root: PathBuf,
}

impl DirectoryUploader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a previously stored file.
    pub fn path_of(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }

    fn upload_error(&self, message: String) -> SigtrimError {
        SigtrimError::Upload {
            message,
            help: Some(format!("Check that {} is writable", self.root.display())),
        }
    }
}

impl Uploader for DirectoryUploader {
    fn upload(&mut self, file: &SignatureFile) -> Result<String> {
        fs::create_dir_all(&self.root)
            .map_err(|e| self.upload_error(format!("cannot create upload directory: {}", e)))?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let base = sanitize_name(&file.name);

        for attempt in 0u32.. {
            let stored = if attempt == 0 {
                format!("{}-{}", millis, base)
            } else {
                format!("{}-{}-{}", millis, attempt, base)
            };
            let path = self.root.join(&stored);

            let handle = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(handle) => handle,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(self.upload_error(format!("cannot create {}: {}", stored, e))),
            };

            write_new(&path, handle, &file.bytes)
                .map_err(|e| self.upload_error(format!("cannot write {}: {}", stored, e)))?;

            log::info!("stored {} ({} bytes) as {}", file.name, file.bytes.len(), stored);
            return Ok(stored);
        }

        Err(self.upload_error("no free storage name".to_string()))
    }

    fn remove(&mut self, stored_name: &str) -> Result<()> {
        fs::remove_file(self.path_of(stored_name))
            .map_err(|e| self.upload_error(format!("cannot remove {}: {}", stored_name, e)))?;
        log::info!("removed {}", stored_name);
        Ok(())
    }
}

/// Fill a file just created at `path`. A failed write deletes the file so
/// no partial upload is left behind.
fn write_new(path: &Path, mut handle: impl Write, bytes: &[u8]) -> io::Result<()> {
    if let Err(e) = handle.write_all(bytes).and_then(|_| handle.flush()) {
        drop(handle);
        if let Err(remove) = fs::remove_file(path) {
            log::warn!("cannot remove partial upload {}: {}", path.display(), remove);
        }
        return Err(e);
    }
    Ok(())
}
