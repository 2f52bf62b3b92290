//! White-level normalization.

use rayon::prelude::*;

use crate::develop::common::{DevelopError, Result, try_filled_vec};

/// Convert black-corrected samples to floats in `[0, 1]` by dividing by the
/// sensor saturation value.
pub fn normalize(samples: &[u16], white_level: u16, band: usize) -> Result<Vec<f32>> {
    if white_level == 0 {
        return Err(DevelopError::InvalidInput(
            "white level must be positive".to_string(),
        ));
    }

    let white = f32::from(white_level);
    let mut normalized = try_filled_vec(0.0f32, samples.len())?;

    normalized
        .par_chunks_mut(band.max(1))
        .zip(samples.par_chunks(band.max(1)))
        .for_each(|(out_band, in_band)| {
            for (out, &sample) in out_band.iter_mut().zip(in_band) {
                *out = (f32::from(sample) / white).clamp(0.0, 1.0);
            }
        });

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_white_level_is_rejected() {
        assert!(matches!(
            normalize(&[0, 1, 2], 0, 64),
            Err(DevelopError::InvalidInput(_))
        ));
    }

    #[test]
    fn samples_map_into_the_unit_interval() {
        let normalized = normalize(&[0, 512, 1023], 1023, 64).unwrap();
        assert_eq!(normalized[0], 0.0);
        assert!((normalized[1] - 512.0 / 1023.0).abs() < 1e-6);
        assert_eq!(normalized[2], 1.0);
    }

    #[test]
    fn samples_above_the_white_level_clamp_to_one() {
        let normalized = normalize(&[2048], 1023, 64).unwrap();
        assert_eq!(normalized[0], 1.0);
    }
}
