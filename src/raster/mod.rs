//! Pixel storage shared by the pipeline stages.

mod bounds;
mod canvas;

pub use bounds::{BoundingBox, Region};
pub use canvas::{Canvas, CHANNELS};
