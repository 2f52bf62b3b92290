//! Interactive RAW photo development.
//!
//! The crate turns mosaiced Bayer sensor data into displayable 8-bit sRGB
//! images through a two-phase pipeline: an expensive, parameter-independent
//! preprocess phase (black level, white level, demosaic) that runs once per
//! image load, and a cheap per-edit render phase (white balance, exposure,
//! colour matrix, gamma, contrast, saturation, quantization) that re-runs on
//! every parameter change against the cached demosaiced buffer.

pub mod develop;
pub mod logger;
