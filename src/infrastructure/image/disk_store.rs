//! Default disk cache gateway with URL-hashed file names.

use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::ports::DiskCacheGateway;

const CACHE_FILE_EXT: &str = "img";

/// Disk store mapping each URL to `<dir>/<sha256-prefix>.img`.
///
/// This is the default [`DiskCacheGateway`]: URL-to-file mapping plus a full
/// clear. It deliberately carries no eviction policy of its own; bounding the
/// directory is the embedding application's concern.
pub struct HashedDiskStore {
    cache_dir: PathBuf,
}

impl HashedDiskStore {
    /// Creates a store rooted at `cache_dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub async fn new(cache_dir: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&cache_dir).await?;
        debug!(dir = %cache_dir.display(), "disk store ready");
        Ok(Self { cache_dir })
    }

    /// Creates a store under the platform cache directory.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub async fn default_location() -> std::io::Result<Self> {
        Self::new(default_cache_dir()).await
    }

    /// Root directory of this store.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.cache_dir
    }
}

#[async_trait::async_trait]
impl DiskCacheGateway for HashedDiskStore {
    fn file_for(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hasher.finalize();
        self.cache_dir
            .join(format!("{}.{CACHE_FILE_EXT}", hex::encode(&digest[..16])))
    }

    async fn clear(&self) -> std::io::Result<()> {
        let mut entries = fs::read_dir(&self.cache_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == CACHE_FILE_EXT)
                && fs::remove_file(&path).await.is_err()
            {
                warn!(path = %path.display(), "failed to remove cache file");
            }
        }
        debug!("cleared disk store");
        Ok(())
    }
}

/// Default store location under the platform cache directory.
fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("io", "lazyimg", "lazyimg").map_or_else(
        || std::env::temp_dir().join("lazyimg").join("images"),
        |dirs| dirs.cache_dir().join("images"),
    )
}
