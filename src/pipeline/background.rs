//! Background check on the sample canvas.
//!
//! Signatures must sit on a white or transparent background so the colour
//! key can remove it. Two checks are available:
//!
//! - `LastPixel` scans in row-major order, stopping at the first translucent
//!   pixel. The whiteness flag is overwritten by every pixel visited, so an
//!   opaque image passes only when the last pixel scanned is pure white.
//!   Existing stored signatures were accepted by this rule.
//! - `Border` requires every pixel on the canvas perimeter to be pure white
//!   or translucent.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SigtrimError};
use crate::raster::{Canvas, CHANNELS};

/// Which background rule to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundCheck {
    /// Last scanned pixel white, or any translucent pixel
    #[default]
    LastPixel,
    /// Whole perimeter white or translucent
    Border,
}

/// Outcome of a background scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundReport {
    pub check: BackgroundCheck,
    pub has_transparent_pixels: bool,
    pub has_white_background: bool,
}

impl BackgroundReport {
    pub fn is_valid(&self) -> bool {
        match self.check {
            BackgroundCheck::LastPixel => self.has_transparent_pixels || self.has_white_background,
            BackgroundCheck::Border => self.has_white_background,
        }
    }
}

fn is_white(px: &[u8]) -> bool {
    px[0] == 255 && px[1] == 255 && px[2] == 255
}

/// Row-major scan with an overwritten whiteness flag.
pub fn scan_last_pixel(canvas: &Canvas) -> BackgroundReport {
    let mut has_transparent_pixels = false;
    let mut has_white_background = false;

    for px in canvas.data().chunks_exact(CHANNELS) {
        if px[3] < 255 {
            has_transparent_pixels = true;
            break;
        }
        has_white_background = is_white(px);
    }

    BackgroundReport {
        check: BackgroundCheck::LastPixel,
        has_transparent_pixels,
        has_white_background,
    }
}

/// Perimeter scan: every edge pixel must be white or translucent.
pub fn scan_border(canvas: &Canvas) -> BackgroundReport {
    let (width, height) = canvas.dimensions();
    let mut has_transparent_pixels = false;
    let mut clean = true;

    let mut visit = |px: [u8; 4]| {
        if px[3] < 255 {
            has_transparent_pixels = true;
        } else if !is_white(&px) {
            clean = false;
        }
    };

    if width > 0 && height > 0 {
        for x in 0..width {
            visit(canvas.pixel(x, 0));
            if height > 1 {
                visit(canvas.pixel(x, height - 1));
            }
        }
        for y in 1..height.saturating_sub(1) {
            visit(canvas.pixel(0, y));
            if width > 1 {
                visit(canvas.pixel(width - 1, y));
            }
        }
    }

    BackgroundReport {
        check: BackgroundCheck::Border,
        has_transparent_pixels,
        has_white_background: clean,
    }
}

/// Scan the sample canvas and reject it if the background is unusable.
pub fn validate(canvas: &Canvas, check: BackgroundCheck) -> Result<BackgroundReport> {
    let report = match check {
        BackgroundCheck::LastPixel => scan_last_pixel(canvas),
        BackgroundCheck::Border => scan_border(canvas),
    };

    log::debug!(
        "background check {:?}: transparent={} white={}",
        check,
        report.has_transparent_pixels,
        report.has_white_background
    );

    if report.is_valid() {
        Ok(report)
    } else {
        Err(SigtrimError::BackgroundValidation {
            help: Some(
                "Scan or export the signature on plain white paper, or save it as a PNG with transparency"
                    .to_string(),
            ),
        })
    }
}
