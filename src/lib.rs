//! lazyimg - An asynchronous image-loading pipeline for UI clients.
//!
//! Given a URL and a target display surface, the loader shows a cached bitmap
//! immediately when one is available, otherwise schedules a background
//! fetch-and-decode and updates the surface once the result arrives, without
//! blocking the interactive thread and without redisplaying a stale result if
//! the surface has been recycled to a different request in the meantime.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing the cache, fetch, decode, and loader adapters.
pub mod infrastructure;

pub use domain::entities::{ImageSource, LoadOutcome, PlaceholderId, RequestKey, SizeClass};
pub use domain::errors::{DecodeError, FetchError, LoadError};
pub use domain::ports::{
    BitmapDecoder, DiskCacheGateway, DisplaySurface, RemoteFetcher, SurfaceToken,
};
pub use infrastructure::image::{
    CacheStats, DisplayQueue, FsBitmapDecoder, HashedDiskStore, HttpFetcher, ImageLoader,
    LoadTicket, LoaderConfig, MemoryImageCache, ReuseTracker,
};

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
