//! Signature normalization pipeline.
//!
//! Stages run in order on an explicitly owned canvas:
//!
//! 1. intake: size and type limits on the selected file
//! 2. sample: decode and draw into a small canvas
//! 3. background: reject images that are not on white or transparency
//! 4. colour key: clear pure white on the full-size canvas
//! 5. trim: crop to the content bounding box
//! 6. encode: PNG, data URL, upload payload
//!
//! Nothing reaches the record store unless the upload succeeded, and an
//! upload whose record cannot be saved is removed again.

pub mod background;
pub mod colorkey;
pub mod encode;
pub mod intake;
pub mod sampler;
pub mod trim;

use image::DynamicImage;

use crate::config::Config;
use crate::error::{Result, SigtrimError};
use crate::files::{SignatureRecord, SourceFile};
use crate::raster::{Canvas, Region};
use crate::store::{RecordStore, Uploader};

pub use background::{BackgroundCheck, BackgroundReport};
pub use intake::IntakeRules;
pub use trim::{TrimMode, LEGACY_COORD_OFFSET};

/// Knobs for the pixel stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub sample_width: u32,
    pub sample_height: u32,
    pub background: BackgroundCheck,
    pub trim: TrimMode,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sample_width: sampler::SAMPLE_WIDTH,
            sample_height: sampler::SAMPLE_HEIGHT,
            background: BackgroundCheck::default(),
            trim: TrimMode::default(),
        }
    }
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            sample_width: config.sample.width,
            sample_height: config.sample.height,
            background: config.background,
            trim: config.trim,
        }
    }
}

/// Trimmed, colour-keyed signature ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    pub canvas: Canvas,
    /// Crop applied to the full-size canvas, `None` if it was kept whole.
    pub region: Option<Region>,
    /// Number of white pixels made transparent.
    pub cleared: usize,
    pub background: BackgroundReport,
}

impl NormalizedImage {
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }
}

/// Check the background of a decoded image using the sample canvas.
pub fn check_background(image: &DynamicImage, options: &PipelineOptions) -> Result<BackgroundReport> {
    let sample = sampler::sample(image, options.sample_width, options.sample_height);
    background::validate(&sample, options.background)
}

/// Run the pixel stages on a decoded image.
pub fn normalize(image: &DynamicImage, options: &PipelineOptions) -> Result<NormalizedImage> {
    let report = check_background(image, options)?;

    let mut canvas = sampler::render(image);
    let cleared = colorkey::clear_white(&mut canvas);
    let (canvas, region) = trim::trim(canvas, options.trim);

    Ok(NormalizedImage {
        canvas,
        region,
        cleared,
        background: report,
    })
}

/// Decode file bytes and run the pixel stages.
pub fn normalize_bytes(bytes: &[u8], options: &PipelineOptions) -> Result<NormalizedImage> {
    let image = sampler::decode(bytes)?;
    normalize(&image, options)
}

/// Result of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub stored_name: String,
    pub record: SignatureRecord,
    pub width: u32,
    pub height: u32,
}

/// Full pipeline wired to an upload service and a record store.
pub struct SignaturePipeline<U, R> {
    options: PipelineOptions,
    intake: IntakeRules,
    uploader: U,
    records: R,
}

impl<U: Uploader, R: RecordStore> SignaturePipeline<U, R> {
    pub fn new(options: PipelineOptions, intake: IntakeRules, uploader: U, records: R) -> Self {
        Self {
            options,
            intake,
            uploader,
            records,
        }
    }

    /// Build a pipeline from loaded configuration.
    pub fn from_config(config: &Config, uploader: U, records: R) -> Self {
        Self::new(
            PipelineOptions::from(config),
            config.intake.clone(),
            uploader,
            records,
        )
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn uploader(&self) -> &U {
        &self.uploader
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    pub fn into_parts(self) -> (U, R) {
        (self.uploader, self.records)
    }

    /// Normalize a selected file, upload it and save its record.
    pub fn submit(&mut self, source: &SourceFile) -> Result<Submission> {
        self.intake.check(source)?;

        let normalized = normalize_bytes(&source.bytes, &self.options)?;
        let file = encode::package(&normalized.canvas, source)?;

        let stored_name = self.uploader.upload(&file)?;
        let record = SignatureRecord::image(stored_name.clone());
        if let Err(e) = self.records.save(&record) {
            self.roll_back(&stored_name);
            return Err(SigtrimError::Persistence {
                message: e.to_string(),
                help: Some(format!("{} was not kept; try the upload again", source.name)),
            });
        }

        log::info!(
            "submitted {} as {} ({}x{})",
            source.name,
            stored_name,
            normalized.width(),
            normalized.height()
        );

        Ok(Submission {
            stored_name,
            record,
            width: normalized.width(),
            height: normalized.height(),
        })
    }

    /// Drop an uploaded file whose record could not be saved.
    fn roll_back(&mut self, stored_name: &str) {
        match self.uploader.remove(stored_name) {
            Ok(()) => log::info!("rolled back upload {}", stored_name),
            Err(e) => log::warn!("orphaned upload {}: {}", stored_name, e),
        }
    }
}
