//! Infrastructure layer with concrete adapters for the domain ports.

/// Image caching, fetching, decoding, and load orchestration.
pub mod image;
