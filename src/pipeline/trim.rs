//! Bounding-box trimming.
//!
//! Content is any pixel with non-zero alpha. The scan visits pixels in
//! row-major order and shifts every coordinate by the trim mode's offset
//! before folding it into a [`BoundingBox`]. The crop region is then snapped
//! to the pixel grid by truncation.
//!
//! `Legacy` reproduces signatures trimmed by the old uploader: coordinates
//! shifted by 1.25 and an exclusive `right - left` extent, which drops the
//! first content row and column. `Exact` crops to the content precisely.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::raster::{BoundingBox, Canvas, Region, CHANNELS};

/// Coordinate shift applied by the legacy trimmer.
pub const LEGACY_COORD_OFFSET: f64 = 1.25;

/// How the crop rectangle is derived from content pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TrimMode {
    /// Crop exactly to the content
    #[default]
    Exact,
    /// Match signatures trimmed by the previous uploader
    Legacy,
}

impl TrimMode {
    /// Shift added to every scanned coordinate.
    pub fn offset(self) -> f64 {
        match self {
            TrimMode::Exact => 0.0,
            TrimMode::Legacy => LEGACY_COORD_OFFSET,
        }
    }

    /// Added to `right - left` and `bottom - top` to get the crop size.
    fn extent(self) -> f64 {
        match self {
            TrimMode::Exact => 1.0,
            TrimMode::Legacy => 0.0,
        }
    }
}

/// Bounding box of all pixels with non-zero alpha, shifted by `offset`.
pub fn find_bounds(canvas: &Canvas, offset: f64) -> BoundingBox {
    let width = canvas.width() as usize;
    let mut bounds = BoundingBox::new();

    if width == 0 {
        return bounds;
    }

    for (i, px) in canvas.data().chunks_exact(CHANNELS).enumerate() {
        if px[3] != 0 {
            let x = (i % width) as f64 + offset;
            let y = (i / width) as f64 + offset;
            bounds.include(x, y);
        }
    }

    bounds
}

/// Pixel rectangle to crop, or `None` when there is nothing to crop to.
///
/// The region is clipped to the canvas. An incomplete box, or one whose
/// region truncates to zero width or height, yields `None`.
pub fn crop_region(bounds: &BoundingBox, mode: TrimMode, width: u32, height: u32) -> Option<Region> {
    let (top, left, right, bottom) = bounds.edges()?;

    let x = left.max(0.0) as u32;
    let y = top.max(0.0) as u32;
    if x >= width || y >= height {
        return None;
    }

    let w = ((right - left + mode.extent()).max(0.0) as u32).min(width - x);
    let h = ((bottom - top + mode.extent()).max(0.0) as u32).min(height - y);
    if w == 0 || h == 0 {
        return None;
    }

    Some(Region {
        x,
        y,
        width: w,
        height: h,
    })
}

/// Crop the canvas to its content.
///
/// Returns the original canvas untouched when no crop region exists, such as
/// for a fully transparent image.
pub fn trim(canvas: Canvas, mode: TrimMode) -> (Canvas, Option<Region>) {
    let bounds = find_bounds(&canvas, mode.offset());
    let (width, height) = canvas.dimensions();

    match crop_region(&bounds, mode, width, height) {
        Some(region) => {
            log::debug!(
                "trimmed {}x{} to {}x{} at ({}, {})",
                width,
                height,
                region.width,
                region.height,
                region.x,
                region.y
            );
            let cropped = canvas.region(region.x, region.y, region.width, region.height);
            (cropped, Some(region))
        }
        None => {
            log::debug!("no content bounds in {}x{}, keeping original", width, height);
            (canvas, None)
        }
    }
}
