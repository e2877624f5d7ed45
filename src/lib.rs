//! sigtrim - Signature image normalizer
//!
//! Takes a user-supplied signature image, checks that it sits on a white or
//! transparent background, keys the white out to transparency, trims it to
//! its content and packages it as a PNG for an upload service.

pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod output;
pub mod pipeline;
pub mod raster;
pub mod store;

pub use config::{Config, CONFIG_FILENAME};
pub use error::{Feedback, Result, SigtrimError};
pub use files::{SignatureFile, SignatureRecord, SourceFile};
pub use pipeline::{
    check_background, normalize, normalize_bytes, BackgroundCheck, BackgroundReport, IntakeRules,
    NormalizedImage, PipelineOptions, SignaturePipeline, Submission, TrimMode,
};
pub use raster::{BoundingBox, Canvas, Region};
pub use store::{
    DirectoryUploader, JsonRecordStore, MemoryRecordStore, MemoryUploader, RecordStore, Uploader,
};
