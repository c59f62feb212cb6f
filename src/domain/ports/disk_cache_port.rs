//! Port definition for the on-disk cache store.

use std::path::PathBuf;

/// Port for the disk-backed byte store.
///
/// The gateway maps a URL to the local file that does or will hold its bytes.
/// Eviction is the gateway's own concern; the pipeline only reads the file,
/// overwrites it on a fresh fetch, and asks for a full clear. A gateway may
/// hand back a path whose file is incomplete (a racing task mid-write); the
/// pipeline treats the resulting decode failure as a miss and refetches.
#[async_trait::async_trait]
pub trait DiskCacheGateway: Send + Sync {
    /// Returns the local file path for a URL. The file may not exist yet.
    fn file_for(&self, url: &str) -> PathBuf;

    /// Removes every cached file.
    async fn clear(&self) -> std::io::Result<()>;
}
