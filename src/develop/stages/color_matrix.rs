//! Colour-space conversion.

use rayon::prelude::*;

/// Apply the camera-native RGB to linear sRGB matrix per pixel, as given.
/// No clamping; out-of-gamut results stay negative or above one until gamma.
pub fn apply(rgb: &mut [f32], rgb_cam: &[[f32; 3]; 3], band: usize) {
    rgb.par_chunks_mut(band.max(3)).for_each(|out_band| {
        for pixel in out_band.chunks_exact_mut(3) {
            let [r, g, b] = [pixel[0], pixel[1], pixel[2]];
            pixel[0] = rgb_cam[0][0] * r + rgb_cam[0][1] * g + rgb_cam[0][2] * b;
            pixel[1] = rgb_cam[1][0] * r + rgb_cam[1][1] * g + rgb_cam[1][2] * b;
            pixel[2] = rgb_cam[2][0] * r + rgb_cam[2][1] * g + rgb_cam[2][2] * b;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    #[test]
    fn identity_matrix_is_the_identity() {
        let mut rgb = vec![0.2, 0.5, 0.8];
        apply(&mut rgb, &IDENTITY, 96);
        assert_eq!(rgb, vec![0.2, 0.5, 0.8]);
    }

    #[test]
    fn rows_mix_channels() {
        let matrix = [[2.0, -1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let mut rgb = vec![0.5, 0.25, 0.125];
        apply(&mut rgb, &matrix, 96);
        assert_eq!(rgb, vec![0.75, 0.25, 0.125]);
    }

    #[test]
    fn results_are_not_clamped() {
        let matrix = [[3.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]];
        let mut rgb = vec![1.0, 0.0, 0.0];
        apply(&mut rgb, &matrix, 96);
        assert_eq!(rgb, vec![3.0, 0.0, -1.0]);
    }
}
