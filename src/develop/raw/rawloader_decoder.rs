//! RAW decoder implementation backed by the rawloader library.
//!
//! rawloader handles the vendor container formats (ARW, CR2, NEF, DNG, ...)
//! and exposes the sensor plane plus per-camera calibration data, which this
//! adapter reshapes into the pipeline's [`RawInput`].

use std::io::Cursor;

use rawloader::RawImageData;
use tracing::{debug, warn};

use crate::develop::common::{DevelopError, Result};
use crate::develop::raw::decoder::RawDecoder;
use crate::develop::raw::types::RawInput;
use crate::develop::stages::cfa;

pub struct RawloaderDecoder;

/// XYZ (D65) to linear sRGB.
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

impl RawDecoder for RawloaderDecoder {
    fn decode(&self, data: &[u8]) -> Result<RawInput> {
        debug!("Decoding RAW container, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| DevelopError::Decode(e.to_string()))?;

        if decoded.cpp != 1 {
            return Err(DevelopError::Unsupported(format!(
                "{} components per pixel, expected a mosaiced sensor",
                decoded.cpp
            )));
        }

        let filters = filters_for_cfa(&decoded.cfa.name)?;
        let wb_raw = wb_multipliers(&decoded.wb_coeffs);
        let rgb_cam = rgb_cam_matrix(&decoded.cam_to_xyz_normalized());

        let bayer: Vec<u16> = match decoded.data {
            RawImageData::Integer(values) => values,
            // Float sensor data is normalized 0.0-1.0; rescale to the u16 range
            RawImageData::Float(values) => values
                .iter()
                .map(|&v| (v * f32::from(u16::MAX)) as u16)
                .collect(),
        };

        // rawloader reports levels per colour in R, G, B, G2 order, which is
        // exactly the CFA code order the pipeline indexes by. Cameras that
        // report only three channels leave the second green at zero; it
        // shares the first green's offset.
        let mut cblack = decoded.blacklevels;
        if cblack[3] == 0 {
            cblack[3] = cblack[1];
        }

        let white_level = decoded.whitelevels.iter().copied().max().unwrap_or(0);

        debug!(
            width = decoded.width,
            height = decoded.height,
            cfa = %decoded.cfa.name,
            white_level,
            "Decoded RAW frame"
        );

        let raw = RawInput {
            width: decoded.width,
            height: decoded.height,
            bayer,
            filters,
            black_level: 0,
            cblack,
            white_level,
            wb_raw,
            rgb_cam,
        };
        raw.validate()?;
        Ok(raw)
    }
}

fn filters_for_cfa(name: &str) -> Result<u32> {
    match name {
        "RGGB" => Ok(cfa::FILTERS_RGGB),
        "BGGR" => Ok(cfa::FILTERS_BGGR),
        "GRBG" => Ok(cfa::FILTERS_GRBG),
        "GBRG" => Ok(cfa::FILTERS_GBRG),
        other => Err(DevelopError::Unsupported(format!(
            "CFA pattern {other:?} is not a 2x2 Bayer mosaic"
        ))),
    }
}

/// First three as-shot multipliers; cameras occasionally report garbage here,
/// in which case the frame falls back to neutral balance.
fn wb_multipliers(coeffs: &[f32; 4]) -> [f32; 3] {
    let wb = [coeffs[0], coeffs[1], coeffs[2]];
    if wb.iter().any(|c| !c.is_finite() || *c <= 0.0) {
        warn!(?coeffs, "Unusable as-shot multipliers, using neutral white balance");
        return [1.0, 1.0, 1.0];
    }
    wb
}

/// Compose camera→XYZ with XYZ→sRGB, then normalize each row so the camera
/// white point maps to sRGB white.
fn rgb_cam_matrix(cam_to_xyz: &[[f32; 4]; 3]) -> [[f32; 3]; 3] {
    let mut rgb_cam = [[0.0f32; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            let mut sum = 0.0;
            for k in 0..3 {
                sum += XYZ_TO_SRGB[r][k] * cam_to_xyz[k][c];
            }
            rgb_cam[r][c] = sum;
        }
    }

    for row in &mut rgb_cam {
        let sum: f32 = row.iter().sum();
        if sum.is_finite() && sum.abs() > f32::EPSILON {
            for entry in row.iter_mut() {
                *entry /= sum;
            }
        }
    }

    rgb_cam
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_cfa_names_map_to_descriptors() {
        assert_eq!(filters_for_cfa("RGGB").unwrap(), cfa::FILTERS_RGGB);
        assert_eq!(filters_for_cfa("BGGR").unwrap(), cfa::FILTERS_BGGR);
        assert_eq!(filters_for_cfa("GRBG").unwrap(), cfa::FILTERS_GRBG);
        assert_eq!(filters_for_cfa("GBRG").unwrap(), cfa::FILTERS_GBRG);
    }

    #[test]
    fn xtrans_cfa_is_unsupported() {
        assert!(matches!(
            filters_for_cfa("GBGGRGRGRBGBGBGRGRGGBG"),
            Err(DevelopError::Unsupported(_))
        ));
    }

    #[test]
    fn degenerate_wb_coefficients_fall_back_to_neutral() {
        assert_eq!(wb_multipliers(&[0.0, 1.0, 1.0, f32::NAN]), [1.0, 1.0, 1.0]);
        assert_eq!(
            wb_multipliers(&[f32::NAN, 1.0, 1.0, 0.0]),
            [1.0, 1.0, 1.0]
        );
        assert_eq!(wb_multipliers(&[2.0, 1.0, 1.5, 0.0]), [2.0, 1.0, 1.5]);
    }

    #[test]
    fn rgb_cam_rows_are_normalized() {
        let cam_to_xyz = [
            [0.4124, 0.3576, 0.1805, 0.0],
            [0.2126, 0.7152, 0.0722, 0.0],
            [0.0193, 0.1192, 0.9505, 0.0],
        ];
        let rgb_cam = rgb_cam_matrix(&cam_to_xyz);
        for row in &rgb_cam {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "row sums to {sum}");
        }
    }
}
