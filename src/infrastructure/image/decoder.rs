//! Scaled decoding of local image files.
//!
//! A first pass reads only the image header to learn the native dimensions,
//! then an integer power-of-two downscale factor is chosen so the decoded
//! result keeps both sides at or above the size class minimum. This bounds
//! decoded memory while keeping enough resolution for the target context.

use std::path::Path;

use image::ImageError;
use tracing::trace;

use crate::domain::errors::DecodeError;
use crate::domain::ports::BitmapDecoder;

/// Largest power-of-two divisor that keeps both dimensions at or above
/// `min_side`. Halving stops as soon as the next halving would drop either
/// side below the minimum.
#[must_use]
pub fn downscale_factor(width: u32, height: u32, min_side: u32) -> u32 {
    let mut w = width;
    let mut h = height;
    let mut factor = 1;

    while w / 2 >= min_side && h / 2 >= min_side {
        w /= 2;
        h /= 2;
        factor *= 2;
    }

    factor
}

/// Default [`BitmapDecoder`] backed by the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBitmapDecoder;

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::IoError(io) => DecodeError::Io(io.to_string()),
        ImageError::Limits(limit) => {
            if matches!(
                limit.kind(),
                image::error::LimitErrorKind::InsufficientMemory
            ) {
                DecodeError::OutOfMemory
            } else {
                DecodeError::Malformed(limit.to_string())
            }
        }
        other => DecodeError::Malformed(other.to_string()),
    }
}

impl BitmapDecoder for FsBitmapDecoder {
    fn probe_bounds(&self, path: &Path) -> Result<(u32, u32), DecodeError> {
        image::image_dimensions(path).map_err(map_image_error)
    }

    fn decode_scaled(
        &self,
        path: &Path,
        factor: u32,
    ) -> Result<image::DynamicImage, DecodeError> {
        let decoded = image::open(path).map_err(map_image_error)?;
        if factor <= 1 {
            return Ok(decoded);
        }

        let width = (decoded.width() / factor).max(1);
        let height = (decoded.height() / factor).max(1);
        trace!(path = %path.display(), factor, width, height, "downscaling decode");
        Ok(decoded.resize_exact(width, height, image::imageops::FilterType::Triangle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1000, 800, 230, 2; "halving twice would drop 800 below 230")]
    #[test_case(1000, 1000, 230, 4)]
    #[test_case(200, 200, 230, 1; "already below minimum")]
    #[test_case(460, 460, 230, 2; "exact boundary halves once")]
    #[test_case(4096, 4096, 74, 32)]
    #[test_case(0, 0, 100, 1)]
    fn factor_cases(width: u32, height: u32, min_side: u32, expected: u32) {
        assert_eq!(downscale_factor(width, height, min_side), expected);
    }

    #[test]
    fn factor_preserves_minimum_side() {
        let factor = downscale_factor(1000, 800, 230);
        assert!(1000 / factor >= 230);
        assert!(800 / factor >= 230);
    }

    fn write_png(dir: &Path, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join("fixture.png");
        image::DynamicImage::new_rgb8(width, height)
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn probe_reads_native_bounds() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_png(temp.path(), 64, 40);

        let bounds = FsBitmapDecoder.probe_bounds(&path).unwrap();
        assert_eq!(bounds, (64, 40));
    }

    #[test]
    fn decode_applies_factor() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_png(temp.path(), 64, 40);

        let img = FsBitmapDecoder.decode_scaled(&path, 2).unwrap();
        assert_eq!((img.width(), img.height()), (32, 20));

        let full = FsBitmapDecoder.decode_scaled(&path, 1).unwrap();
        assert_eq!((full.width(), full.height()), (64, 40));
    }

    #[test]
    fn malformed_file_is_a_decode_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("junk.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(
            FsBitmapDecoder.probe_bounds(&path),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            FsBitmapDecoder.decode_scaled(&path, 1),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("absent.png");

        assert!(matches!(
            FsBitmapDecoder.probe_bounds(&path),
            Err(DecodeError::Io(_))
        ));
    }
}
