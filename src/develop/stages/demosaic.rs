//! Bilinear demosaic.
//!
//! Reconstructs a three-channel image from the single-channel mosaic. At each
//! site the sampled channel is copied and the two missing channels are
//! averaged from the 3x3 neighborhood; sampling past the border replicates
//! the edge pixel. The output is the parameter-independent cache the render
//! phase works from.

use rayon::prelude::*;

use crate::develop::common::{Result, try_filled_vec};
use crate::develop::stages::cfa;

pub fn bilinear(
    plane: &[f32],
    width: usize,
    height: usize,
    filters: u32,
    band_rows: usize,
) -> Result<Vec<f32>> {
    let mut rgb = try_filled_vec(0.0f32, plane.len() * 3)?;
    let band = (width * 3 * band_rows).max(1);

    rgb.par_chunks_mut(band)
        .enumerate()
        .for_each(|(band_index, out_band)| {
            let y0 = band_index * band_rows;
            for (row_index, out_row) in out_band.chunks_mut(width * 3).enumerate() {
                demosaic_row(plane, width, height, filters, y0 + row_index, out_row);
            }
        });

    Ok(rgb)
}

fn demosaic_row(
    plane: &[f32],
    width: usize,
    height: usize,
    filters: u32,
    y: usize,
    out_row: &mut [f32],
) {
    // Edge-replicate sampling
    let sample = |x: isize, y: isize| -> f32 {
        let x = x.clamp(0, width as isize - 1) as usize;
        let y = y.clamp(0, height as isize - 1) as usize;
        plane[y * width + x]
    };

    let yi = y as isize;
    for (x, out) in out_row.chunks_exact_mut(3).enumerate() {
        let xi = x as isize;
        let code = cfa::color_at(filters, x, y);

        let cross = (sample(xi, yi - 1) + sample(xi, yi + 1) + sample(xi - 1, yi)
            + sample(xi + 1, yi))
            / 4.0;
        let diagonal = (sample(xi - 1, yi - 1)
            + sample(xi + 1, yi - 1)
            + sample(xi - 1, yi + 1)
            + sample(xi + 1, yi + 1))
            / 4.0;
        let horizontal = (sample(xi - 1, yi) + sample(xi + 1, yi)) / 2.0;
        let vertical = (sample(xi, yi - 1) + sample(xi, yi + 1)) / 2.0;

        let (r, g, b) = match code {
            cfa::RED => (sample(xi, yi), cross, diagonal),
            cfa::BLUE => (diagonal, cross, sample(xi, yi)),
            _ => {
                // Green site: the horizontal neighbor tells us which row we
                // are in, red-green or blue-green
                if cfa::color_at(filters, x + 1, y) == cfa::RED {
                    (horizontal, sample(xi, yi), vertical)
                } else {
                    (vertical, sample(xi, yi), horizontal)
                }
            }
        };

        out[0] = r;
        out[1] = g;
        out[2] = b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(rgb: &[f32], width: usize, x: usize, y: usize) -> [f32; 3] {
        let i = (y * width + x) * 3;
        [rgb[i], rgb[i + 1], rgb[i + 2]]
    }

    #[test]
    fn uniform_plane_stays_uniform() {
        let plane = vec![0.5f32; 16];
        let rgb = bilinear(&plane, 4, 4, cfa::FILTERS_RGGB, 32).unwrap();
        assert!(rgb.iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn red_impulse_spreads_to_neighbors_only() {
        // 5x5 RGGB, a single lit red site at the center
        let mut plane = vec![0.0f32; 25];
        plane[2 * 5 + 2] = 1.0;
        let rgb = bilinear(&plane, 5, 5, cfa::FILTERS_RGGB, 32).unwrap();

        // At the impulse: red copied, the interpolated channels see only
        // dark neighbors
        assert_eq!(pixel(&rgb, 5, 2, 2), [1.0, 0.0, 0.0]);

        // The green site to the left sits in a red-green row; red is the
        // horizontal average
        assert_eq!(pixel(&rgb, 5, 1, 2), [0.5, 0.0, 0.0]);

        // The green site above sits in a blue-green row; red is the vertical
        // average
        assert_eq!(pixel(&rgb, 5, 2, 1), [0.5, 0.0, 0.0]);

        // The blue site diagonal to the impulse sees it in its corner average
        assert_eq!(pixel(&rgb, 5, 1, 1), [0.25, 0.0, 0.0]);
    }

    #[test]
    fn border_sampling_replicates_the_edge() {
        // 2x2 RGGB with a lit red corner; the corner's missing channels may
        // only draw from inside the frame
        let plane = vec![1.0f32, 0.0, 0.0, 0.0];
        let rgb = bilinear(&plane, 2, 2, cfa::FILTERS_RGGB, 32).unwrap();

        let corner = pixel(&rgb, 2, 0, 0);
        assert_eq!(corner[0], 1.0);
        // Cross average: two replicated red samples, two zero greens
        assert_eq!(corner[1], 0.5);
        // Diagonal average: the replicated corner itself plus three others
        assert!((corner[2] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn channels_are_swapped_between_rggb_and_bggr() {
        let mut plane = vec![0.0f32; 25];
        plane[2 * 5 + 2] = 1.0;
        let rggb = bilinear(&plane, 5, 5, cfa::FILTERS_RGGB, 32).unwrap();
        let bggr = bilinear(&plane, 5, 5, cfa::FILTERS_BGGR, 32).unwrap();
        assert_eq!(pixel(&rggb, 5, 2, 2), [1.0, 0.0, 0.0]);
        assert_eq!(pixel(&bggr, 5, 2, 2), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn band_size_does_not_change_the_result() {
        let plane: Vec<f32> = (0..100).map(|i| (i as f32) / 100.0).collect();
        let a = bilinear(&plane, 10, 10, cfa::FILTERS_GRBG, 1).unwrap();
        let b = bilinear(&plane, 10, 10, cfa::FILTERS_GRBG, 3).unwrap();
        let c = bilinear(&plane, 10, 10, cfa::FILTERS_GRBG, 64).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }
}
