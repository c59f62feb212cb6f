//! Failure taxonomy for fetch, decode, and load operations.
//!
//! None of these escape the public entry points as faults: the coordinator
//! converts every failure into an absent result and leaves the placeholder
//! shown. They stay distinguishable so tests and callers inspecting a
//! [`LoadOutcome`](crate::domain::entities::LoadOutcome) can tell which leg
//! failed.

/// Result type for loader operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Top-level failure of one load request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// Connect/read timeout or connection error during the network leg.
    #[error("network failure: {0}")]
    Network(String),
    /// Malformed or truncated image data.
    #[error("decode failure: {0}")]
    Decode(String),
    /// Allocation failure while decoding. The memory cache has already been
    /// cleared as a recovery action by the time this is observed.
    #[error("memory pressure during decode")]
    MemoryPressure,
}

/// Failure while fetching a resource into a local file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connection could not be established.
    #[error("connect failed: {0}")]
    Connect(String),
    /// Connect or read deadline elapsed.
    #[error("timed out: {0}")]
    Timeout(String),
    /// Server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),
    /// Transport-level failure mid-stream.
    #[error("transfer failed: {0}")]
    Transfer(String),
    /// Writing the fetched bytes to the local file failed.
    #[error("file write failed: {0}")]
    Io(String),
}

impl From<FetchError> for LoadError {
    fn from(err: FetchError) -> Self {
        Self::Network(err.to_string())
    }
}

/// Failure while probing or decoding a local image file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The data is not a decodable image.
    #[error("malformed image: {0}")]
    Malformed(String),
    /// The decoder could not allocate the pixel buffer.
    #[error("out of memory while decoding")]
    OutOfMemory,
    /// The file could not be read.
    #[error("read failed: {0}")]
    Io(String),
}

impl From<DecodeError> for LoadError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::OutOfMemory => Self::MemoryPressure,
            other => Self::Decode(other.to_string()),
        }
    }
}
