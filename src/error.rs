use miette::Diagnostic;
use thiserror::Error;

/// Message shown when the sampled background is neither white nor transparent.
pub const BACKGROUND_MESSAGE: &str = "please upload image with white or transparent background only";

/// Message shown when the trimmed canvas cannot be turned into an upload payload.
pub const ENCODING_MESSAGE: &str = "unable to process image";

/// Where a failure is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Inline message attached to the upload field.
    Field,
    /// Toast-style notification, for failures after the pipeline has finished.
    Notification,
}

/// Main error type for sigtrim operations
#[derive(Error, Diagnostic, Debug)]
pub enum SigtrimError {
    #[error("IO error: {0}")]
    #[diagnostic(code(sigtrim::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(sigtrim::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(sigtrim::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("File rejected: {message}")]
    #[diagnostic(code(sigtrim::intake))]
    Rejected {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unable to decode image: {message}")]
    #[diagnostic(code(sigtrim::decode), help("Select a PNG, JPEG, GIF, WebP or BMP file"))]
    Decode { message: String },

    #[error("please upload image with white or transparent background only")]
    #[diagnostic(code(sigtrim::background))]
    BackgroundValidation {
        #[help]
        help: Option<String>,
    },

    #[error("unable to process image: {message}")]
    #[diagnostic(code(sigtrim::encode))]
    Encoding { message: String },

    #[error("Upload failed: {message}")]
    #[diagnostic(code(sigtrim::upload))]
    Upload {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Saving signature failed: {message}")]
    #[diagnostic(code(sigtrim::persistence))]
    Persistence {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl SigtrimError {
    /// The feedback surface this error belongs on.
    ///
    /// Upload and persistence failures happen after the pipeline has handed
    /// the file off, so they become notifications. Everything else is
    /// reported on the field.
    pub fn channel(&self) -> Feedback {
        match self {
            SigtrimError::Upload { .. } | SigtrimError::Persistence { .. } => {
                Feedback::Notification
            }
            _ => Feedback::Field,
        }
    }
}

pub type Result<T> = std::result::Result<T, SigtrimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_error_message() {
        let err = SigtrimError::BackgroundValidation { help: None };
        assert_eq!(err.to_string(), BACKGROUND_MESSAGE);
    }

    #[test]
    fn test_encoding_error_message_prefix() {
        let err = SigtrimError::Encoding {
            message: "bad base64".to_string(),
        };
        assert_eq!(err.to_string(), "unable to process image: bad base64");
    }

    #[test]
    fn test_upload_is_notification() {
        let err = SigtrimError::Upload {
            message: "disk full".to_string(),
            help: None,
        };
        assert_eq!(err.channel(), Feedback::Notification);
    }

    #[test]
    fn test_persistence_is_notification() {
        let err = SigtrimError::Persistence {
            message: "record file is corrupt".to_string(),
            help: None,
        };
        assert_eq!(err.channel(), Feedback::Notification);
        assert_eq!(err.to_string(), "Saving signature failed: record file is corrupt");
    }

    #[test]
    fn test_pipeline_errors_are_field_level() {
        let decode = SigtrimError::Decode {
            message: "truncated".to_string(),
        };
        let background = SigtrimError::BackgroundValidation { help: None };
        let encoding = SigtrimError::Encoding {
            message: "x".to_string(),
        };

        assert_eq!(decode.channel(), Feedback::Field);
        assert_eq!(background.channel(), Feedback::Field);
        assert_eq!(encoding.channel(), Feedback::Field);
    }
}
