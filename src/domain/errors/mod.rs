//! Error types for the loading pipeline.

mod load_error;

pub use load_error::{DecodeError, FetchError, LoadError, LoadResult};
