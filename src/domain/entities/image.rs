//! Request identity and load lifecycle types.

use crate::domain::entities::SizeClass;
use crate::domain::errors::LoadError;

/// Identity of one load request.
///
/// The memory cache and the reuse tracker are both keyed by the full
/// (url, size class) pair, so a second request for the same URL at a different
/// size class is a distinct request and can never surface a wrongly-sized
/// cached bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    /// Resource URL, compared by exact value.
    pub url: String,
    /// Display context the bitmap is destined for.
    pub size_class: SizeClass,
}

impl RequestKey {
    /// Creates a key from a URL and size class.
    #[must_use]
    pub fn new(url: impl Into<String>, size_class: SizeClass) -> Self {
        Self {
            url: url.into(),
            size_class,
        }
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.url, self.size_class.tag())
    }
}

/// Where a resolved image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Found in the in-memory cache.
    MemoryCache,
    /// Decoded from the disk cache.
    DiskCache,
    /// Fetched over the network.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::DiskCache => write!(f, "disk"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Terminal state of one load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The memory cache held the image; it was applied synchronously.
    CacheHit,
    /// The surface was reassigned before the result could be used. The
    /// in-flight work was discarded; this is an expected outcome, not an error.
    Stale,
    /// The image was resolved and handed to the display queue.
    Resolved(ImageSource),
    /// Resolution failed; the placeholder stays up until an explicit re-request.
    Failed(LoadError),
    /// The loader shut down before the task ran.
    Abandoned,
}

impl LoadOutcome {
    /// Returns true if the request produced a displayable image.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::CacheHit | Self::Resolved(_))
    }

    /// Returns true if the result was discarded as stale.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}
