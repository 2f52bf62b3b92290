use std::io::Write;

use tracing::debug;

use crate::develop::common::{DevelopError, Result};
use crate::develop::raw::types::RgbImage8;
use crate::develop::tiff::types::{TiffCompression, WriterConfig};
use crate::develop::tiff::writer::ImageWriter;

/// TIFF encoder for the finished 8-bit sRGB image.
pub struct TiffImageWriter;

impl TiffImageWriter {
    fn compression(compression: TiffCompression) -> tiff::encoder::Compression {
        use tiff::encoder::compression::DeflateLevel;
        match compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => {
                tiff::encoder::Compression::Deflate(DeflateLevel::Balanced)
            }
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(DeflateLevel::Best),
        }
    }
}

impl ImageWriter for TiffImageWriter {
    fn write_image(
        &self,
        image: &RgbImage8,
        output: &mut dyn Write,
        config: &WriterConfig,
    ) -> Result<()> {
        debug!("Encoding RGB TIFF image: {}x{}", image.width, image.height);

        let mut buffer = Vec::new();
        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| DevelopError::Encode(e.to_string()))?
            .with_compression(Self::compression(config.compression));

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => tiff::tags::Predictor::Horizontal,
                _ => tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        encoder
            .write_image::<tiff::encoder::colortype::RGB8>(image.width, image.height, &image.pixels)
            .map_err(|e| DevelopError::Encode(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("RGB TIFF encoding complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn test_image() -> RgbImage8 {
        RgbImage8 {
            width: 3,
            height: 2,
            pixels: vec![
                255, 0, 0, 0, 255, 0, 0, 0, 255, //
                10, 20, 30, 40, 50, 60, 70, 80, 90,
            ],
        }
    }

    #[test]
    fn writes_a_little_endian_tiff_header() {
        let mut output = Cursor::new(Vec::new());
        TiffImageWriter
            .write_image(&test_image(), &mut output, &WriterConfig::default())
            .unwrap();

        let bytes = output.into_inner();
        assert!(bytes.len() > 8);
        assert_eq!(&bytes[..4], b"II*\0");
    }

    #[test]
    fn compression_variants_all_encode() {
        for compression in [
            TiffCompression::None,
            TiffCompression::Lzw,
            TiffCompression::DeflateFast,
            TiffCompression::DeflateBalanced,
            TiffCompression::DeflateBest,
        ] {
            let config = WriterConfig {
                compression,
                predictor: Some(2),
            };
            let mut output = Cursor::new(Vec::new());
            assert!(
                TiffImageWriter
                    .write_image(&test_image(), &mut output, &config)
                    .is_ok()
            );
            assert!(!output.into_inner().is_empty());
        }
    }

    #[test]
    fn writes_through_an_arbitrary_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.tiff");
        let mut file = std::fs::File::create(&path).unwrap();

        TiffImageWriter
            .write_image(&test_image(), &mut file, &WriterConfig::default())
            .unwrap();
        drop(file);

        let written = std::fs::read(&path).unwrap();
        assert_eq!(&written[..4], b"II*\0");
    }
}
