//! File and record values exchanged with the upload and persistence services.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SigtrimError};

/// Record text marking a signature stored as an image.
pub const IMAGE_RECORD_TEXT: &str = "IMAGE";

/// A file selected by the user, before any processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    /// Declared MIME type, derived from the file name.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| SigtrimError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read file: {}", e),
        })?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("signature")
            .to_string();

        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .map(mime_for_extension)
            .unwrap_or("application/octet-stream");

        Ok(Self::new(name, mime, bytes))
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(0) | None => &self.name,
            Some(i) => &self.name[..i],
        }
    }
}

/// MIME type a browser would declare for a file extension.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Packaged upload payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Structured record handed to the persistence service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub text: String,
    pub image: String,
}

impl SignatureRecord {
    /// Record pointing at an uploaded signature image.
    pub fn image(stored_name: impl Into<String>) -> Self {
        Self {
            text: IMAGE_RECORD_TEXT.to_string(),
            image: stored_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("PNG"), "image/png");
        assert_eq!(mime_for_extension("jpg"), "image/jpeg");
        assert_eq!(mime_for_extension("jpeg"), "image/jpeg");
        assert_eq!(mime_for_extension("txt"), "application/octet-stream");
    }

    #[test]
    fn test_stem() {
        let file = SourceFile::new("john.signature.jpg", "image/jpeg", vec![]);
        assert_eq!(file.stem(), "john.signature");

        let bare = SourceFile::new("signature", "image/png", vec![]);
        assert_eq!(bare.stem(), "signature");

        let hidden = SourceFile::new(".png", "image/png", vec![]);
        assert_eq!(hidden.stem(), ".png");
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sig.JPG");
        fs::write(&path, b"abc").unwrap();

        let file = SourceFile::from_path(&path).unwrap();
        assert_eq!(file.name, "sig.JPG");
        assert_eq!(file.mime, "image/jpeg");
        assert_eq!(file.bytes, b"abc");
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempdir().unwrap();
        let result = SourceFile::from_path(&dir.path().join("nope.png"));
        assert!(matches!(result, Err(SigtrimError::Io { .. })));
    }

    #[test]
    fn test_record_json_shape() {
        let record = SignatureRecord::image("1700000000000-sig.png");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"text":"IMAGE","image":"1700000000000-sig.png"}"#);
    }
}
