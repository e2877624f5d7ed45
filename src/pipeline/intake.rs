//! Upload constraints checked before any pixels are touched.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SigtrimError};
use crate::files::SourceFile;

/// Default maximum upload size (5 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted types and size limit for uploaded signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeRules {
    /// Accepted MIME types; `image/*` style wildcards are allowed.
    pub accept: Vec<String>,

    /// Largest accepted file, in bytes.
    pub max_bytes: u64,
}

impl Default for IntakeRules {
    fn default() -> Self {
        Self {
            accept: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
                "image/bmp".to_string(),
            ],
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl IntakeRules {
    /// Whether a MIME type matches one of the accept patterns.
    pub fn accepts(&self, mime: &str) -> bool {
        self.accept.iter().any(|pattern| match pattern.strip_suffix("/*") {
            Some(top) => mime.split('/').next() == Some(top),
            None => pattern.eq_ignore_ascii_case(mime),
        })
    }

    /// Check a selected file and return the MIME type sniffed from its bytes.
    pub fn check(&self, file: &SourceFile) -> Result<&'static str> {
        if file.bytes.is_empty() {
            return Err(SigtrimError::Rejected {
                message: format!("{} is empty", file.name),
                help: None,
            });
        }

        if file.bytes.len() as u64 > self.max_bytes {
            return Err(SigtrimError::Rejected {
                message: format!(
                    "{} is {} bytes, the limit is {}",
                    file.name,
                    file.bytes.len(),
                    self.max_bytes
                ),
                help: Some("Export the signature at a lower resolution".to_string()),
            });
        }

        let kind = infer::get(&file.bytes).ok_or_else(|| SigtrimError::Rejected {
            message: format!("{} is not a recognisable image", file.name),
            help: Some(format!("Accepted types: {}", self.accept.join(", "))),
        })?;

        if kind.matcher_type() != infer::MatcherType::Image || !self.accepts(kind.mime_type()) {
            return Err(SigtrimError::Rejected {
                message: format!("{} has unsupported type {}", file.name, kind.mime_type()),
                help: Some(format!("Accepted types: {}", self.accept.join(", "))),
            });
        }

        log::debug!("accepted {} as {}", file.name, kind.mime_type());
        Ok(kind.mime_type())
    }
}
