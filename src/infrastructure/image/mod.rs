//! Image loading infrastructure.
//!
//! This module provides:
//! - Byte-budgeted memory caching with LRU eviction
//! - A hashed-filename disk store
//! - Network fetch and scaled decode adapters
//! - The async load coordinator with view-reuse staleness guards

pub mod decoder;
pub mod dispatch;
pub mod disk_store;
pub mod fetcher;
pub mod loader;
pub mod memory_cache;
pub mod tracker;

pub use decoder::{FsBitmapDecoder, downscale_factor};
pub use dispatch::DisplayQueue;
pub use disk_store::HashedDiskStore;
pub use fetcher::HttpFetcher;
pub use loader::{ImageLoader, LoadTicket, LoaderConfig};
pub use memory_cache::{CacheStats, MemoryImageCache};
pub use tracker::ReuseTracker;
