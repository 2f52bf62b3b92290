use std::io::Write;

use crate::develop::common::Result;
use crate::develop::raw::types::RgbImage8;
use crate::develop::tiff::types::WriterConfig;

/// Boundary to the output encoder; the pipeline itself never touches file
/// formats.
pub trait ImageWriter {
    fn write_image(
        &self,
        image: &RgbImage8,
        output: &mut dyn Write,
        config: &WriterConfig,
    ) -> Result<()>;
}
