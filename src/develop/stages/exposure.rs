//! Exposure gain.

use rayon::prelude::*;

/// Scale all channels by the exposure factor. Values may exceed 1.0 here;
/// the gamma stage clamps before display coding.
pub fn apply(rgb: &mut [f32], exposure: f32, band: usize) {
    rgb.par_chunks_mut(band.max(1)).for_each(|out_band| {
        for value in out_band.iter_mut() {
            *value *= exposure;
        }
    });
}
