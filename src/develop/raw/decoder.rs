use crate::develop::common::Result;
use crate::develop::raw::types::RawInput;

/// Boundary to the camera-file decoder.
///
/// Implementations parse a vendor RAW container and surface the Bayer plane
/// plus calibration metadata; the pipeline itself never touches file formats.
pub trait RawDecoder {
    fn decode(&self, data: &[u8]) -> Result<RawInput>;
}
