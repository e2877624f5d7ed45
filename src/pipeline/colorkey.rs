//! White colour key.

use crate::raster::{Canvas, CHANNELS};

/// Replace every pure white pixel with transparent black, in place.
///
/// Only exact `255,255,255` matches, whatever the alpha; anti-aliased
/// near-white edge pixels are kept. Returns how many pixels were cleared.
pub fn clear_white(canvas: &mut Canvas) -> usize {
    let mut cleared = 0;

    for px in canvas.data_mut().chunks_exact_mut(CHANNELS) {
        if px[0] == 255 && px[1] == 255 && px[2] == 255 {
            px.copy_from_slice(&[0, 0, 0, 0]);
            cleared += 1;
        }
    }

    log::debug!("colour key cleared {} pixel(s)", cleared);
    cleared
}
