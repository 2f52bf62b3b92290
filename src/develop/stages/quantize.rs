//! Quantization to 8-bit.

use rayon::prelude::*;

use crate::develop::common::{Result, try_filled_vec};

/// Round the gamma-coded floats to interleaved 8-bit RGB.
pub fn to_rgb8(rgb: &[f32], band: usize) -> Result<Vec<u8>> {
    let mut bytes = try_filled_vec(0u8, rgb.len())?;

    bytes
        .par_chunks_mut(band.max(1))
        .zip(rgb.par_chunks(band.max(1)))
        .for_each(|(out_band, in_band)| {
            for (out, &value) in out_band.iter_mut().zip(in_band) {
                *out = (value * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        });

    Ok(bytes)
}
