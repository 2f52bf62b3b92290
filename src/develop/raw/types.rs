//! Sensor data types

use crate::develop::common::{DevelopError, Result};

/// Mosaiced sensor readout plus the calibration metadata needed to develop it.
///
/// Produced by a [`RawDecoder`](super::RawDecoder) implementation; the
/// pipeline treats it as read-only for its lifetime.
#[derive(Debug, Clone)]
pub struct RawInput {
    /// Width of the Bayer plane in pixels
    pub width: usize,
    /// Height of the Bayer plane in pixels
    pub height: usize,
    /// Single-channel Bayer samples, row-major, `width * height` entries
    pub bayer: Vec<u16>,
    /// 32-bit CFA descriptor: 16 two-bit colour codes (0=R, 1=G1, 2=B, 3=G2)
    pub filters: u32,
    /// Global sensor black offset
    pub black_level: u16,
    /// Additional per-channel black offsets, indexed by CFA colour code
    pub cblack: [u16; 4],
    /// Sensor saturation value, the normalization denominator
    pub white_level: u16,
    /// As-shot white balance multipliers for R, G, B
    pub wb_raw: [f32; 3],
    /// Camera-native RGB to linear sRGB matrix, row-major
    pub rgb_cam: [[f32; 3]; 3],
}

impl RawInput {
    /// Check the structural invariants the decoder is required to uphold.
    ///
    /// Dimension limits are a pipeline configuration concern and are checked
    /// separately by the orchestrator.
    pub fn validate(&self) -> Result<()> {
        if self.width * self.height != self.bayer.len() {
            return Err(DevelopError::InvalidInput(format!(
                "Bayer plane is {} samples, expected {}x{} = {}",
                self.bayer.len(),
                self.width,
                self.height,
                self.width * self.height
            )));
        }

        if self.white_level == 0 {
            return Err(DevelopError::InvalidInput(
                "white level must be positive".to_string(),
            ));
        }

        for (channel, &offset) in self.cblack.iter().enumerate() {
            let total = u32::from(self.black_level) + u32::from(offset);
            if total > u32::from(u16::MAX) {
                return Err(DevelopError::InvalidInput(format!(
                    "black offset {total} for channel {channel} exceeds the 16-bit sample range"
                )));
            }
        }

        for (channel, &multiplier) in self.wb_raw.iter().enumerate() {
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(DevelopError::InvalidInput(format!(
                    "white balance multiplier {multiplier} for channel {channel} must be a positive finite number"
                )));
            }
        }

        if self
            .rgb_cam
            .iter()
            .flatten()
            .any(|entry| !entry.is_finite())
        {
            return Err(DevelopError::InvalidInput(
                "colour matrix contains non-finite entries".to_string(),
            ));
        }

        Ok(())
    }
}

/// Finished 8-bit sRGB image, ready for display or encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage8 {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Interleaved RGB bytes, 3 per pixel, top-left origin, no padding
    pub pixels: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_raw() -> RawInput {
        RawInput {
            width: 2,
            height: 2,
            bayer: vec![0; 4],
            filters: 0x9494_9494,
            black_level: 0,
            cblack: [0; 4],
            white_level: 1023,
            wb_raw: [1.0, 1.0, 1.0],
            rgb_cam: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(minimal_raw().validate().is_ok());
    }

    #[test]
    fn plane_length_mismatch_is_rejected() {
        let mut raw = minimal_raw();
        raw.bayer.pop();
        assert!(matches!(
            raw.validate(),
            Err(DevelopError::InvalidInput(_))
        ));
    }

    #[test]
    fn zero_white_level_is_rejected() {
        let mut raw = minimal_raw();
        raw.white_level = 0;
        assert!(matches!(
            raw.validate(),
            Err(DevelopError::InvalidInput(_))
        ));
    }

    #[test]
    fn overflowing_black_offset_is_rejected() {
        let mut raw = minimal_raw();
        raw.black_level = u16::MAX;
        raw.cblack = [0, 1, 0, 0];
        assert!(matches!(
            raw.validate(),
            Err(DevelopError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_positive_wb_multiplier_is_rejected() {
        let mut raw = minimal_raw();
        raw.wb_raw = [1.0, 0.0, 1.0];
        assert!(raw.validate().is_err());

        raw.wb_raw = [1.0, f32::NAN, 1.0];
        assert!(raw.validate().is_err());
    }

    #[test]
    fn non_finite_matrix_is_rejected() {
        let mut raw = minimal_raw();
        raw.rgb_cam[1][2] = f32::INFINITY;
        assert!(raw.validate().is_err());
    }
}
