//! Content bounding box.

/// Running bounding box over content pixels.
///
/// Every edge stays `None` until the first content pixel is included.
/// Coordinates are fractional because callers may shift them by a constant
/// offset before including them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the box to include a point.
    ///
    /// `top` keeps the first `y` seen, so points must arrive in row-major
    /// order for it to be the minimum.
    pub fn include(&mut self, x: f64, y: f64) {
        if self.top.is_none() {
            self.top = Some(y);
        }
        self.left = Some(self.left.map_or(x, |l| l.min(x)));
        self.right = Some(self.right.map_or(x, |r| r.max(x)));
        self.bottom = Some(self.bottom.map_or(y, |b| b.max(y)));
    }

    /// True once all four edges are known.
    pub fn is_complete(&self) -> bool {
        self.top.is_some() && self.left.is_some() && self.right.is_some() && self.bottom.is_some()
    }

    /// `(top, left, right, bottom)` when complete.
    pub fn edges(&self) -> Option<(f64, f64, f64, f64)> {
        Some((self.top?, self.left?, self.right?, self.bottom?))
    }
}

/// Integer pixel rectangle, used for the final crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
