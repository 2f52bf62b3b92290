//! Development parameters.

/// Slider ticks per doubling step; the UI range of ±100 ticks spans roughly
/// ±3 stops of exposure.
pub const SLIDER_TICK_INTERVAL: i32 = 33;

/// Immutable snapshot of the user's edits for one render.
///
/// All three values are multiplicative factors with 1.0 the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub exposure: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from integer slider positions.
    pub fn from_ticks(exposure: i32, contrast: i32, saturation: i32) -> Self {
        Self {
            exposure: Self::exposure_from_tick(exposure),
            contrast: Self::contrast_from_tick(contrast),
            saturation: Self::saturation_from_tick(saturation),
        }
    }

    pub fn exposure_from_tick(tick: i32) -> f32 {
        2.0f32.powf(tick as f32 / SLIDER_TICK_INTERVAL as f32)
    }

    pub fn contrast_from_tick(tick: i32) -> f32 {
        1.5f32.powf(tick as f32 / SLIDER_TICK_INTERVAL as f32)
    }

    pub fn saturation_from_tick(tick: i32) -> f32 {
        2.0f32.powf(tick as f32 / SLIDER_TICK_INTERVAL as f32)
    }
}
