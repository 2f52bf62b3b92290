//! Output image encoding boundary.

pub mod tiff_writer;
pub mod types;
pub mod writer;

pub use tiff_writer::TiffImageWriter;
pub use types::{TiffCompression, WriterConfig};
pub use writer::ImageWriter;
