//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ImageSource, LoadOutcome, RequestKey, SizeClass};
pub use errors::{LoadError, LoadResult};
pub use ports::{DiskCacheGateway, DisplaySurface, RemoteFetcher, SurfaceToken};
