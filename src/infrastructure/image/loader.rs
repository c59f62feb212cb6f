//! Async load coordinator.
//!
//! One `request` call either applies a cached image on the spot or shows the
//! placeholder and hands the work to a bounded pool. A worker checks
//! staleness before resolving, resolves disk-first with a network fallback,
//! stores the result in the memory cache, checks staleness again, and
//! dispatches the display update; the interactive thread makes a final
//! staleness check when it pumps the [`DisplayQueue`]. Surfaces recycled
//! between any two checkpoints simply lose the stale result; there is no
//! hard cancellation.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Weak};

use tokio::sync::{Semaphore, mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{ImageSource, LoadOutcome, RequestKey, SizeClass};
use crate::domain::errors::{DecodeError, LoadError};
use crate::domain::ports::{
    BitmapDecoder, DiskCacheGateway, DisplaySurface, RemoteFetcher, SurfaceToken,
};

use super::decoder::{FsBitmapDecoder, downscale_factor};
use super::dispatch::{DisplayCommand, DisplayQueue};
use super::disk_store::HashedDiskStore;
use super::fetcher::HttpFetcher;
use super::memory_cache::{DEFAULT_MEMORY_BUDGET, MemoryImageCache};
use super::tracker::ReuseTracker;

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Budget for decoded images held in memory, in bytes.
    pub memory_budget_bytes: usize,
    /// Fixed number of concurrent load workers.
    pub worker_count: usize,
    /// Network connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Network read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET,
            worker_count: 5,
            connect_timeout_secs: 30,
            read_timeout_secs: 30,
        }
    }
}

/// Awaitable completion handle for one load request.
///
/// Resolves to the request's terminal state once the worker is done with it;
/// display application may still be pending in the [`DisplayQueue`] at that
/// point.
#[derive(Debug)]
pub struct LoadTicket {
    rx: oneshot::Receiver<LoadOutcome>,
}

impl LoadTicket {
    fn immediate(outcome: LoadOutcome) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(outcome);
        Self { rx }
    }

    /// Awaits the terminal state of the request.
    pub async fn outcome(self) -> LoadOutcome {
        self.rx.await.unwrap_or(LoadOutcome::Abandoned)
    }
}

/// One queued unit of work. Consumed exactly once by a worker.
struct LoadTask {
    key: RequestKey,
    token: SurfaceToken,
    surface: Weak<dyn DisplaySurface>,
    done: oneshot::Sender<LoadOutcome>,
}

/// Shared state the worker tasks run against.
struct Pipeline {
    memory_cache: Arc<MemoryImageCache>,
    gateway: Arc<dyn DiskCacheGateway>,
    fetcher: Arc<dyn RemoteFetcher>,
    decoder: Arc<dyn BitmapDecoder>,
    tracker: Arc<ReuseTracker>,
    display_tx: mpsc::UnboundedSender<DisplayCommand>,
}

/// Orchestrates image loading from memory, disk, and network.
pub struct ImageLoader {
    pipeline: Arc<Pipeline>,
    task_tx: mpsc::UnboundedSender<LoadTask>,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader").finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Creates a loader wired to the given collaborators, plus the display
    /// queue the interactive thread must pump.
    ///
    /// Must be called within a tokio runtime; the worker loop is spawned here
    /// and shuts down when the loader is dropped.
    #[must_use]
    pub fn new(
        config: &LoaderConfig,
        gateway: Arc<dyn DiskCacheGateway>,
        fetcher: Arc<dyn RemoteFetcher>,
        decoder: Arc<dyn BitmapDecoder>,
    ) -> (Self, DisplayQueue) {
        let memory_cache = Arc::new(MemoryImageCache::new(config.memory_budget_bytes));
        let tracker = Arc::new(ReuseTracker::new());
        let (display_tx, display_rx) = mpsc::unbounded_channel();
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let semaphore = Arc::new(Semaphore::new(config.worker_count.max(1)));

        let pipeline = Arc::new(Pipeline {
            memory_cache,
            gateway,
            fetcher,
            decoder,
            tracker: tracker.clone(),
            display_tx,
        });

        tokio::spawn(run_worker_loop(pipeline.clone(), task_rx, semaphore));

        let loader = Self { pipeline, task_tx };
        (loader, DisplayQueue::new(display_rx, tracker))
    }

    /// Creates a loader with the default disk store, HTTP fetcher, and
    /// filesystem decoder.
    ///
    /// # Errors
    /// Returns an error if the disk store directory or the HTTP client cannot
    /// be created.
    pub async fn with_defaults(config: &LoaderConfig) -> std::io::Result<(Self, DisplayQueue)> {
        let gateway = Arc::new(HashedDiskStore::default_location().await?);
        let fetcher = HttpFetcher::new(config.connect_timeout_secs, config.read_timeout_secs)
            .map_err(std::io::Error::other)?;
        Ok(Self::new(
            config,
            gateway,
            Arc::new(fetcher),
            Arc::new(FsBitmapDecoder),
        ))
    }

    /// Entry point: shows a cached image immediately, or shows the size
    /// class's placeholder and schedules a background load.
    ///
    /// Must be called from the interactive thread: on a cache hit the
    /// surface is mutated synchronously here.
    pub fn request<S>(&self, url: &str, surface: &Arc<S>, size_class: SizeClass) -> LoadTicket
    where
        S: DisplaySurface + 'static,
    {
        let key = RequestKey::new(url, size_class);
        let token = surface.token();
        self.pipeline.tracker.assign(token, key.clone());

        if let Some(img) = self.pipeline.memory_cache.get(&key) {
            trace!(key = %key, "serving request from memory cache");
            surface.apply_image(img);
            return LoadTicket::immediate(LoadOutcome::CacheHit);
        }

        surface.apply_placeholder(size_class.placeholder());

        let dyn_surface: Arc<dyn DisplaySurface> = surface.clone();
        let (done_tx, done_rx) = oneshot::channel();
        let task = LoadTask {
            key,
            token,
            surface: Arc::downgrade(&dyn_surface),
            done: done_tx,
        };
        if self.task_tx.send(task).is_err() {
            warn!("worker loop has shut down, dropping load request");
        }
        LoadTicket { rx: done_rx }
    }

    /// [`request`](Self::request) with a string size-class tag; unknown tags
    /// use the conservative fallback class.
    pub fn request_tagged<S>(&self, url: &str, surface: &Arc<S>, tag: &str) -> LoadTicket
    where
        S: DisplaySurface + 'static,
    {
        self.request(url, surface, SizeClass::from_tag(tag))
    }

    /// Best-effort direct fetch-and-decode at native resolution, bypassing
    /// the memory cache and the async machinery. All faults collapse to
    /// `None`.
    pub async fn fetch_image(&self, url: &str) -> Option<Arc<image::DynamicImage>> {
        let path = self.pipeline.gateway.file_for(url);
        if let Err(err) = self.pipeline.fetcher.fetch_to_file(url, &path).await {
            debug!(url, error = %err, "direct fetch failed");
            return None;
        }

        let decoder = self.pipeline.decoder.clone();
        let decode_path = path.clone();
        match tokio::task::spawn_blocking(move || decoder.decode_scaled(&decode_path, 1)).await {
            Ok(Ok(img)) => Some(Arc::new(img)),
            Ok(Err(err)) => {
                debug!(url, error = %err, "direct decode failed");
                None
            }
            Err(err) => {
                warn!(url, error = %err, "direct decode task panicked");
                None
            }
        }
    }

    /// Clears the memory cache and the disk gateway.
    pub async fn clear_cache(&self) {
        self.pipeline.memory_cache.clear();
        if let Err(err) = self.pipeline.gateway.clear().await {
            warn!(error = %err, "failed to clear disk store");
        }
        info!("cleared image caches");
    }

    /// Returns memory cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> super::memory_cache::CacheStats {
        self.pipeline.memory_cache.stats()
    }
}

/// Feeds queued tasks to workers, newest first: during a fast scroll the most
/// recent assignment is the one still on screen, and older entries are likely
/// to be found stale anyway.
async fn run_worker_loop(
    pipeline: Arc<Pipeline>,
    mut task_rx: mpsc::UnboundedReceiver<LoadTask>,
    semaphore: Arc<Semaphore>,
) {
    let mut queue: VecDeque<LoadTask> = VecDeque::new();

    loop {
        tokio::select! {
            task = task_rx.recv() => {
                match task {
                    Some(task) => queue.push_front(task),
                    None => break,
                }
            }
            Ok(permit) = semaphore.clone().acquire_owned(), if !queue.is_empty() => {
                if let Some(task) = queue.pop_front() {
                    let pipeline = pipeline.clone();
                    tokio::spawn(async move {
                        let LoadTask { key, token, surface, done } = task;
                        let outcome = pipeline.execute(&key, token, surface).await;
                        let _ = done.send(outcome);
                        drop(permit);
                    });
                }
            }
        }
    }
    debug!("worker loop shut down");
}

impl Pipeline {
    /// Runs one task through the per-request state machine.
    async fn execute(
        &self,
        key: &RequestKey,
        token: SurfaceToken,
        surface: Weak<dyn DisplaySurface>,
    ) -> LoadOutcome {
        if self.tracker.is_stale(token, key) {
            trace!(key = %key, token = %token, "stale before resolve, discarding");
            return LoadOutcome::Stale;
        }

        // A concurrent task for the same key may have landed while this one
        // sat in the queue.
        if let Some(img) = self.memory_cache.get(key) {
            self.dispatch(token, key, surface, Some(img));
            return LoadOutcome::Resolved(ImageSource::MemoryCache);
        }

        match self.resolve(key).await {
            Ok((img, source)) => {
                self.memory_cache.put(key.clone(), img.clone());
                if self.tracker.is_stale(token, key) {
                    trace!(key = %key, token = %token, "stale after resolve, discarding");
                    return LoadOutcome::Stale;
                }
                debug!(key = %key, source = %source, "image resolved");
                self.dispatch(token, key, surface, Some(img));
                LoadOutcome::Resolved(source)
            }
            Err(err) => {
                debug!(key = %key, error = %err, "load failed, placeholder stays");
                if !self.tracker.is_stale(token, key) {
                    self.dispatch(token, key, surface, None);
                }
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Disk-first resolution with a single network fallback.
    async fn resolve(
        &self,
        key: &RequestKey,
    ) -> Result<(Arc<image::DynamicImage>, ImageSource), LoadError> {
        let path = self.gateway.file_for(&key.url);
        let min_side = key.size_class.min_side();

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            match self.decode(&path, min_side).await {
                Ok(img) => {
                    trace!(key = %key, "resolved from disk cache");
                    return Ok((img, ImageSource::DiskCache));
                }
                Err(DecodeError::OutOfMemory) => return Err(self.memory_pressure(key)),
                Err(err) => {
                    // Possibly a partial file from a racing writer; the
                    // network fetch below overwrites it.
                    debug!(key = %key, error = %err, "disk copy unusable, refetching");
                }
            }
        }

        self.fetcher
            .fetch_to_file(&key.url, &path)
            .await
            .map_err(LoadError::from)?;

        match self.decode(&path, min_side).await {
            Ok(img) => Ok((img, ImageSource::Network)),
            Err(DecodeError::OutOfMemory) => Err(self.memory_pressure(key)),
            Err(err) => Err(err.into()),
        }
    }

    /// Emergency response to a decode-time allocation failure: drop every
    /// cached image before reporting the error.
    fn memory_pressure(&self, key: &RequestKey) -> LoadError {
        warn!(key = %key, "decode hit memory pressure, clearing memory cache");
        self.memory_cache.clear();
        LoadError::MemoryPressure
    }

    /// Bounds probe plus scaled decode, off the async threads.
    async fn decode(
        &self,
        path: &Path,
        min_side: u32,
    ) -> Result<Arc<image::DynamicImage>, DecodeError> {
        let decoder = self.decoder.clone();
        let path = path.to_path_buf();

        let result = tokio::task::spawn_blocking(move || {
            let (width, height) = decoder.probe_bounds(&path)?;
            let factor = downscale_factor(width, height, min_side);
            decoder.decode_scaled(&path, factor)
        })
        .await;

        match result {
            Ok(Ok(img)) => Ok(Arc::new(img)),
            Ok(Err(err)) => Err(err),
            Err(err) => Err(DecodeError::Malformed(format!("decode task panicked: {err}"))),
        }
    }

    fn dispatch(
        &self,
        token: SurfaceToken,
        key: &RequestKey,
        surface: Weak<dyn DisplaySurface>,
        image: Option<Arc<image::DynamicImage>>,
    ) {
        let command = DisplayCommand {
            token,
            key: key.clone(),
            surface,
            image,
            placeholder: key.size_class.placeholder(),
        };
        if self.display_tx.send(command).is_err() {
            trace!(key = %key, "display queue is gone, dropping update");
        }
    }
}
