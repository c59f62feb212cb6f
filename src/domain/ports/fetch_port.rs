//! Port definition for the raw network fetch.

use std::path::Path;

use crate::domain::errors::FetchError;

/// Port for fetching a remote resource into a local file.
///
/// Implementations must enforce connect and read timeouts and follow
/// redirects. The destination is overwritten; on failure the file may be left
/// partial, which downstream decode treats as a miss.
#[async_trait::async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Streams the resource at `url` into `dest`.
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}
