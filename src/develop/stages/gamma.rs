//! Gamma correction.

use rayon::prelude::*;

/// Display gamma. A plain power curve, not the piecewise sRGB OETF; close
/// enough for preview work and considerably cheaper.
const GAMMA: f32 = 2.2;

pub fn apply(rgb: &mut [f32], band: usize) {
    rgb.par_chunks_mut(band.max(1)).for_each(|out_band| {
        for value in out_band.iter_mut() {
            *value = value.clamp(0.0, 1.0).powf(1.0 / GAMMA);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        let mut rgb = vec![0.0, 1.0];
        apply(&mut rgb, 96);
        assert_eq!(rgb, vec![0.0, 1.0]);
    }

    #[test]
    fn out_of_range_values_clamp_before_the_curve() {
        let mut rgb = vec![-0.5, 2.0];
        apply(&mut rgb, 96);
        assert_eq!(rgb, vec![0.0, 1.0]);
    }

    #[test]
    fn midtones_are_lifted() {
        let mut rgb = vec![0.5];
        apply(&mut rgb, 96);
        assert!((rgb[0] - 0.5f32.powf(1.0 / 2.2)).abs() < 1e-6);
        assert!(rgb[0] > 0.5);
    }
}
