//! White balance.

use rayon::prelude::*;

/// Per-channel gains from the as-shot multipliers, normalized so the
/// brightest channel keeps unit gain and nothing is pushed past saturation.
pub fn gains(wb_raw: &[f32; 3]) -> [f32; 3] {
    let max = wb_raw[0].max(wb_raw[1]).max(wb_raw[2]);
    [wb_raw[0] / max, wb_raw[1] / max, wb_raw[2] / max]
}

pub fn apply(rgb: &mut [f32], gains: [f32; 3], band: usize) {
    rgb.par_chunks_mut(band.max(3)).for_each(|out_band| {
        for pixel in out_band.chunks_exact_mut(3) {
            pixel[0] *= gains[0];
            pixel[1] *= gains[1];
            pixel[2] *= gains[2];
        }
    });
}
