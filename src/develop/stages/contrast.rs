//! Contrast.

use rayon::prelude::*;

/// Pivot of the contrast stretch, the gamma-space middle gray.
const MIDPOINT: f32 = 0.5;

/// Affine stretch about the midpoint, clamped back into `[0, 1]`.
pub fn apply(rgb: &mut [f32], contrast: f32, band: usize) {
    rgb.par_chunks_mut(band.max(1)).for_each(|out_band| {
        for value in out_band.iter_mut() {
            *value = ((*value - MIDPOINT) * contrast + MIDPOINT).clamp(0.0, 1.0);
        }
    });
}
