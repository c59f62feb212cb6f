//! Port definition for bitmap decode primitives.

use std::path::Path;

use crate::domain::errors::DecodeError;

/// Port for the two decode primitives the pipeline needs: a header-only
/// bounds probe and a decode at an integer downscale factor.
///
/// Calls are blocking by design; the loader runs them on the blocking pool.
pub trait BitmapDecoder: Send + Sync {
    /// Reads native (width, height) without allocating a pixel buffer.
    fn probe_bounds(&self, path: &Path) -> Result<(u32, u32), DecodeError>;

    /// Decodes the file with both dimensions divided by `factor` (≥ 1).
    fn decode_scaled(&self, path: &Path, factor: u32)
    -> Result<image::DynamicImage, DecodeError>;
}
