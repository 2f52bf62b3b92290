//! Sensor input types and the RAW decoder boundary.

pub mod decoder;
pub mod rawloader_decoder;
pub mod types;

pub use decoder::RawDecoder;
pub use rawloader_decoder::RawloaderDecoder;
pub use types::{RawInput, RgbImage8};
