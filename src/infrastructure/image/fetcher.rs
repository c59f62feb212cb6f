//! Network fetch of remote resources into local files.

use std::path::Path;
use std::time::Duration;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

use crate::domain::errors::FetchError;
use crate::domain::ports::RemoteFetcher;

/// Default [`RemoteFetcher`] backed by `reqwest`.
///
/// Connect and read timeouts are fixed at construction; redirects are
/// followed. The body is streamed to the destination file chunk by chunk, so
/// a large image never has to fit in memory twice.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given connect and read timeouts.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(connect_timeout_secs: u64, read_timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .build()
            .map_err(|e| FetchError::Connect(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

fn map_request_error(err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(err.to_string())
    } else if err.is_connect() {
        FetchError::Connect(err.to_string())
    } else if let Some(status) = err.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Transfer(err.to_string())
    }
}

#[async_trait::async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_request_error(&e))?;

        let mut response = response
            .error_for_status()
            .map_err(|e| map_request_error(&e))?;

        let mut file = fs::File::create(dest)
            .await
            .map_err(|e| FetchError::Io(format!("failed to create {}: {e}", dest.display())))?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(|e| map_request_error(&e))? {
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::Io(format!("failed to write {}: {e}", dest.display())))?;
            written += chunk.len() as u64;
            trace!(url, written, "fetch progress");
        }

        file.flush()
            .await
            .map_err(|e| FetchError::Io(format!("failed to flush {}: {e}", dest.display())))?;

        debug!(url, dest = %dest.display(), bytes = written, "fetched resource to disk");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_with_timeouts() {
        assert!(HttpFetcher::new(30, 30).is_ok());
    }

    #[tokio::test]
    async fn invalid_url_is_a_transfer_error() {
        let fetcher = HttpFetcher::new(1, 1).unwrap();
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("out.img");

        let err = fetcher
            .fetch_to_file("not a url at all", &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transfer(_)));
    }
}
