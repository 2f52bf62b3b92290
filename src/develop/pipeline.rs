//! Two-phase development orchestrator.
//!
//! `preprocess` runs the parameter-independent head of the pipeline (black
//! level, white level, demosaic) and yields a [`Preprocessed`] handle owning
//! the demosaiced float cache. `process` runs the parameter-dependent tail
//! (white balance through quantization) against that cache; an interactive
//! edit only ever pays for the tail. [`PipelineState`] is the sum type the
//! cache ownership moves through.

use tracing::{debug, instrument, warn};

use crate::develop::common::{DevelopError, Result};
use crate::develop::params::Parameters;
use crate::develop::raw::{RawInput, RgbImage8};
use crate::develop::stages::{
    black_level, color_matrix, contrast, demosaic, exposure, gamma, quantize, saturation,
    white_balance, white_level,
};
use crate::develop::timing::{PipelineTimings, Timer};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct DevelopConfig {
    /// Whether to validate image dimensions before preprocessing
    pub validate_dimensions: bool,
    /// Largest accepted width or height
    pub max_dimension: Option<usize>,
    /// Row-band height the per-pixel stages parallelize over
    pub band_rows: usize,
}

impl Default for DevelopConfig {
    fn default() -> Self {
        Self {
            validate_dimensions: true,
            max_dimension: Some(50_000),
            band_rows: 32,
        }
    }
}

impl DevelopConfig {
    pub fn builder() -> DevelopConfigBuilder {
        DevelopConfigBuilder::default()
    }
}

/// Builder for DevelopConfig
#[derive(Default)]
pub struct DevelopConfigBuilder {
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    band_rows: Option<usize>,
}

impl DevelopConfigBuilder {
    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn band_rows(mut self, rows: usize) -> Self {
        self.band_rows = Some(rows);
        self
    }

    pub fn build(self) -> DevelopConfig {
        let default = DevelopConfig::default();
        DevelopConfig {
            validate_dimensions: self
                .validate_dimensions
                .unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            band_rows: self.band_rows.unwrap_or(default.band_rows),
        }
    }
}

/// The cached result of the parameter-independent pipeline head.
///
/// Owns the demosaiced linear RGB buffer plus the calibration the render
/// phase still needs. Dropping the handle releases the cache.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    width: usize,
    height: usize,
    gains: [f32; 3],
    rgb_cam: [[f32; 3]; 3],
    linear_rgb: Vec<f32>,
}

impl Preprocessed {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Interleaved linear RGB in `[0, 1]`, the cache-boundary buffer.
    pub fn linear_rgb(&self) -> &[f32] {
        &self.linear_rgb
    }
}

pub struct DevelopPipeline {
    config: DevelopConfig,
}

impl Default for DevelopPipeline {
    fn default() -> Self {
        Self::new(DevelopConfig::default())
    }
}

impl DevelopPipeline {
    pub fn new(config: DevelopConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DevelopConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DevelopConfig) {
        self.config = config;
    }

    fn validate(&self, raw: &RawInput) -> Result<()> {
        raw.validate()?;

        if !self.config.validate_dimensions {
            return Ok(());
        }

        if raw.width == 0 || raw.height == 0 {
            return Err(DevelopError::InvalidInput(format!(
                "degenerate image dimensions {}x{}",
                raw.width, raw.height
            )));
        }

        if let Some(max) = self.config.max_dimension {
            if raw.width > max || raw.height > max {
                warn!(
                    width = raw.width,
                    height = raw.height,
                    max,
                    "Image dimensions exceed the configured maximum"
                );
                return Err(DevelopError::InvalidInput(format!(
                    "image dimensions {}x{} exceed the maximum {max}",
                    raw.width, raw.height
                )));
            }
        }

        Ok(())
    }

    /// Run the parameter-independent head once for a newly loaded image.
    pub fn preprocess(&self, raw: &RawInput) -> Result<Preprocessed> {
        self.preprocess_with_timings(raw).map(|(pre, _)| pre)
    }

    #[instrument(skip_all, fields(width = raw.width, height = raw.height))]
    pub fn preprocess_with_timings(
        &self,
        raw: &RawInput,
    ) -> Result<(Preprocessed, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        self.validate(raw)?;

        let band_rows = self.config.band_rows.max(1);

        let timer = Timer::start("black_level");
        let corrected = black_level::subtract(
            &raw.bayer,
            raw.width,
            raw.filters,
            raw.black_level,
            &raw.cblack,
            band_rows,
        )?;
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        let timer = Timer::start("white_level");
        let normalized =
            white_level::normalize(&corrected, raw.white_level, raw.width * band_rows)?;
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        let timer = Timer::start("demosaic");
        let linear_rgb =
            demosaic::bilinear(&normalized, raw.width, raw.height, raw.filters, band_rows)?;
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        debug!(
            ms = format_args!("{:.3}", timings.total_duration().as_secs_f64() * 1000.0),
            "Preprocess complete"
        );

        Ok((
            Preprocessed {
                width: raw.width,
                height: raw.height,
                gains: white_balance::gains(&raw.wb_raw),
                rgb_cam: raw.rgb_cam,
                linear_rgb,
            },
            timings,
        ))
    }

    /// Run the parameter-dependent tail against the cached buffer.
    ///
    /// Pure in `(cache, params)`: identical inputs produce byte-identical
    /// output.
    pub fn process(&self, preprocessed: &Preprocessed, params: &Parameters) -> Result<RgbImage8> {
        self.process_with_timings(preprocessed, params)
            .map(|(image, _)| image)
    }

    #[instrument(skip_all, fields(width = preprocessed.width, height = preprocessed.height))]
    pub fn process_with_timings(
        &self,
        preprocessed: &Preprocessed,
        params: &Parameters,
    ) -> Result<(RgbImage8, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        let band = (preprocessed.width * 3 * self.config.band_rows.max(1)).max(3);

        // Working copy; the cache itself must survive for the next edit
        let mut working = Vec::new();
        working
            .try_reserve_exact(preprocessed.linear_rgb.len())
            .map_err(|e| {
                DevelopError::OutOfMemory(format!(
                    "{} elements: {e}",
                    preprocessed.linear_rgb.len()
                ))
            })?;
        working.extend_from_slice(&preprocessed.linear_rgb);

        let timer = Timer::start("white_balance");
        white_balance::apply(&mut working, preprocessed.gains, band);
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        let timer = Timer::start("exposure");
        exposure::apply(&mut working, params.exposure, band);
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        let timer = Timer::start("color_matrix");
        color_matrix::apply(&mut working, &preprocessed.rgb_cam, band);
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        let timer = Timer::start("gamma");
        gamma::apply(&mut working, band);
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        let timer = Timer::start("contrast");
        contrast::apply(&mut working, params.contrast, band);
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        let timer = Timer::start("saturation");
        saturation::apply(&mut working, params.saturation, band);
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        let timer = Timer::start("quantize");
        let pixels = quantize::to_rgb8(&working, band)?;
        let (name, duration) = timer.stop();
        timings.add_step(name, duration);

        debug!(
            ms = format_args!("{:.3}", timings.total_duration().as_secs_f64() * 1000.0),
            "Render complete"
        );

        Ok((
            RgbImage8 {
                width: preprocessed.width as u32,
                height: preprocessed.height as u32,
                pixels,
            },
            timings,
        ))
    }
}

/// Lifecycle of one edited image.
///
/// Ownership of the float cache moves through the transitions: `load` builds
/// it, `render` carries it along (re-rendering only the tail), `release`
/// drops it. A failed `load` or `render` leaves the previous state, and the
/// previously rendered image, in place.
#[derive(Debug, Default)]
pub enum PipelineState {
    #[default]
    Empty,
    Preprocessed(Preprocessed),
    Rendered {
        preprocessed: Preprocessed,
        last_params: Parameters,
        rgb8: RgbImage8,
    },
}

impl PipelineState {
    pub fn new() -> Self {
        Self::Empty
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The most recently rendered image, if any.
    pub fn current_image(&self) -> Option<&RgbImage8> {
        match self {
            Self::Rendered { rgb8, .. } => Some(rgb8),
            _ => None,
        }
    }

    /// Preprocess a newly loaded image, replacing whatever was held before.
    pub fn load(&mut self, pipeline: &DevelopPipeline, raw: &RawInput) -> Result<()> {
        let preprocessed = pipeline.preprocess(raw)?;
        *self = Self::Preprocessed(preprocessed);
        Ok(())
    }

    /// Render with the given parameters, reusing the cached float buffer.
    ///
    /// A repeated render with unchanged parameters returns the held image
    /// without recomputing anything.
    pub fn render(&mut self, pipeline: &DevelopPipeline, params: Parameters) -> Result<&RgbImage8> {
        self.render_with_timings(pipeline, params)
            .map(|(image, _)| image)
    }

    pub fn render_with_timings(
        &mut self,
        pipeline: &DevelopPipeline,
        params: Parameters,
    ) -> Result<(&RgbImage8, PipelineTimings)> {
        let (preprocessed, held) = match std::mem::take(self) {
            Self::Empty => return Err(DevelopError::NotPreprocessed),
            Self::Preprocessed(preprocessed) => (preprocessed, None),
            Self::Rendered {
                preprocessed,
                last_params,
                rgb8,
            } => {
                let held = (last_params == params).then_some(rgb8);
                (preprocessed, held)
            }
        };

        let (rgb8, timings) = match held {
            // Unchanged parameters: serve the held image, zero steps run
            Some(rgb8) => (rgb8, PipelineTimings::new()),
            None => match pipeline.process_with_timings(&preprocessed, &params) {
                Ok(pair) => pair,
                Err(e) => {
                    *self = Self::Preprocessed(preprocessed);
                    return Err(e);
                }
            },
        };

        *self = Self::Rendered {
            preprocessed,
            last_params: params,
            rgb8,
        };
        match self {
            Self::Rendered { rgb8, .. } => Ok((rgb8, timings)),
            _ => Err(DevelopError::NotPreprocessed),
        }
    }

    /// Drop the cached buffers and return to `Empty`.
    pub fn release(&mut self) {
        *self = Self::Empty;
    }
}
