//! Saturation.
//!
//! Runs after gamma, scaling each pixel's chromatic distance from its
//! luminance. The Rec.709 weights are applied to gamma-coded values, which
//! matches the intended preview behavior even though the weights are defined
//! on linear light.

use rayon::prelude::*;

const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

pub fn apply(rgb: &mut [f32], saturation: f32, band: usize) {
    rgb.par_chunks_mut(band.max(3)).for_each(|out_band| {
        for pixel in out_band.chunks_exact_mut(3) {
            let luma = LUMA_R * pixel[0] + LUMA_G * pixel[1] + LUMA_B * pixel[2];
            for value in pixel.iter_mut() {
                *value = (luma + saturation * (*value - luma)).clamp(0.0, 1.0);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_saturation_is_the_identity() {
        let mut rgb = vec![0.9, 0.2, 0.4];
        apply(&mut rgb, 1.0, 96);
        assert!((rgb[0] - 0.9).abs() < 1e-6);
        assert!((rgb[1] - 0.2).abs() < 1e-6);
        assert!((rgb[2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn zero_saturation_collapses_to_luminance() {
        let mut rgb = vec![0.9, 0.2, 0.4];
        let luma = LUMA_R * 0.9 + LUMA_G * 0.2 + LUMA_B * 0.4;
        apply(&mut rgb, 0.0, 96);
        assert!(rgb.iter().all(|&v| (v - luma).abs() < 1e-6));
    }

    #[test]
    fn gray_pixels_are_unaffected() {
        let mut rgb = vec![0.6, 0.6, 0.6];
        apply(&mut rgb, 3.0, 96);
        assert!(rgb.iter().all(|&v| (v - 0.6).abs() < 1e-6));
    }

    #[test]
    fn boosted_chroma_clamps_into_range() {
        let mut rgb = vec![1.0, 0.0, 0.0];
        apply(&mut rgb, 4.0, 96);
        assert!(rgb.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_eq!(rgb[1], 0.0);
        assert_eq!(rgb[2], 0.0);
        assert_eq!(rgb[0], 1.0);
    }
}
