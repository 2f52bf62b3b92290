//! RAW development pipeline.
//!
//! Submodules are organized along the pipeline's seams: `raw` holds the
//! sensor input types and the decoder boundary, `stages` the per-pixel
//! kernels, `pipeline` the two-phase orchestrator and its state machine,
//! `session` the debounced interactive edit loop, and `tiff` the output
//! writer boundary.

pub mod common;
pub mod params;
pub mod pipeline;
pub mod raw;
pub mod session;
pub mod stages;
pub mod tiff;
pub mod timing;

pub use common::{DevelopError, Result};

pub use params::{Parameters, SLIDER_TICK_INTERVAL};

pub use raw::{RawDecoder, RawInput, RawloaderDecoder, RgbImage8};

pub use pipeline::{
    DevelopConfig, DevelopConfigBuilder, DevelopPipeline, PipelineState, Preprocessed,
};

pub use session::{Session, DEBOUNCE_DELAY};

pub use self::tiff::{ImageWriter, TiffCompression, TiffImageWriter, WriterConfig};

pub use timing::{PipelineTimings, StepTiming, Timer};
