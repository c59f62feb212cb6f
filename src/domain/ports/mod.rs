//! Port definitions for external collaborators.
//!
//! The display surface, the disk cache store, the network fetch, and the
//! decode primitives are collaborators of the pipeline, not part of it. Each
//! is specified here as a trait; `infrastructure::image` ships default
//! implementations, and tests substitute doubles.

mod decode_port;
mod disk_cache_port;
mod fetch_port;
mod surface_port;

pub use decode_port::BitmapDecoder;
pub use disk_cache_port::DiskCacheGateway;
pub use fetch_port::RemoteFetcher;
pub use surface_port::{DisplaySurface, SurfaceToken};
