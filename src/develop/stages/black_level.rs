//! Black-level correction.

use rayon::prelude::*;

use crate::develop::common::{DevelopError, Result, try_filled_vec};
use crate::develop::stages::cfa;

/// Subtract the per-channel black offsets from every Bayer sample.
///
/// Underflow saturates at zero; a dark frame never wraps. The offsets
/// themselves must fit the 16-bit sample range.
pub fn subtract(
    bayer: &[u16],
    width: usize,
    filters: u32,
    black_level: u16,
    cblack: &[u16; 4],
    band_rows: usize,
) -> Result<Vec<u16>> {
    let mut offsets = [0u32; 4];
    for (channel, offset) in offsets.iter_mut().enumerate() {
        *offset = u32::from(black_level) + u32::from(cblack[channel]);
        if *offset > u32::from(u16::MAX) {
            return Err(DevelopError::InvalidInput(format!(
                "black offset {} for channel {channel} exceeds the 16-bit sample range",
                *offset
            )));
        }
    }

    let mut corrected = try_filled_vec(0u16, bayer.len())?;
    let band = (width * band_rows).max(1);

    corrected
        .par_chunks_mut(band)
        .zip(bayer.par_chunks(band))
        .enumerate()
        .for_each(|(band_index, (out_band, in_band))| {
            let y0 = band_index * band_rows;
            for (i, (out, &sample)) in out_band.iter_mut().zip(in_band).enumerate() {
                let x = i % width;
                let y = y0 + i / width;
                let offset = offsets[cfa::color_at(filters, x, y)];
                *out = u32::from(sample).saturating_sub(offset) as u16;
            }
        });

    Ok(corrected)
}
