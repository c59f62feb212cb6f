//! Port definition for display surfaces.

use std::sync::Arc;

use crate::domain::entities::PlaceholderId;

/// Stable identity of a display surface.
///
/// Surfaces in list UIs are recycled across many logical rows, so identity
/// cannot be tied to the request: the token must stay the same for the whole
/// life of the widget it names, and must never be reused for another live
/// surface. The reuse tracker keys on this token instead of holding the
/// surface itself, so tracking a surface never extends its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceToken(pub u64);

impl std::fmt::Display for SurfaceToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Port for anything that can display a loaded image.
///
/// Methods are only ever invoked from the interactive thread: either
/// synchronously inside [`ImageLoader::request`](crate::ImageLoader::request)
/// on a cache hit, or while that thread pumps the
/// [`DisplayQueue`](crate::DisplayQueue). Implementations needing interior
/// mutability can rely on that single-threaded discipline.
pub trait DisplaySurface: Send + Sync {
    /// Returns this surface's stable identity token.
    fn token(&self) -> SurfaceToken;

    /// Shows a decoded image.
    fn apply_image(&self, image: Arc<image::DynamicImage>);

    /// Shows the placeholder for a pending or failed load.
    fn apply_placeholder(&self, placeholder: PlaceholderId);
}
