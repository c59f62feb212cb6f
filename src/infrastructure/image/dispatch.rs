//! Marshalling of display updates onto the interactive thread.
//!
//! Workers never touch a surface. Every display mutation travels through one
//! ordered channel and is applied only when the interactive thread pumps the
//! queue, which is also where the final staleness check happens: reassignment
//! can race the window between a worker dispatching a result and the
//! interactive thread applying it.

use std::sync::{Arc, Weak};

use tokio::sync::mpsc;
use tracing::trace;

use crate::domain::entities::{PlaceholderId, RequestKey};
use crate::domain::ports::{DisplaySurface, SurfaceToken};
use crate::infrastructure::image::ReuseTracker;

/// One display mutation waiting for the interactive thread.
pub(crate) struct DisplayCommand {
    pub(crate) token: SurfaceToken,
    pub(crate) key: RequestKey,
    pub(crate) surface: Weak<dyn DisplaySurface>,
    /// Resolved image, or `None` to re-show the placeholder after a failure.
    pub(crate) image: Option<Arc<image::DynamicImage>>,
    pub(crate) placeholder: PlaceholderId,
}

/// Receiving half of the display channel, owned by the interactive thread.
pub struct DisplayQueue {
    rx: mpsc::UnboundedReceiver<DisplayCommand>,
    tracker: Arc<ReuseTracker>,
}

impl DisplayQueue {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<DisplayCommand>,
        tracker: Arc<ReuseTracker>,
    ) -> Self {
        Self { rx, tracker }
    }

    /// Applies every queued display update without blocking. Returns the
    /// number of surfaces actually mutated; stale and dead-surface commands
    /// are dropped silently.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(cmd) = self.rx.try_recv() {
            if self.apply(cmd) {
                applied += 1;
            }
        }
        applied
    }

    /// Awaits and applies display updates until the loader shuts down.
    /// For event-driven UIs whose interactive loop is itself async.
    pub async fn run(mut self) {
        while let Some(cmd) = self.rx.recv().await {
            self.apply(cmd);
        }
    }

    fn apply(&self, cmd: DisplayCommand) -> bool {
        if self.tracker.is_stale(cmd.token, &cmd.key) {
            trace!(token = %cmd.token, key = %cmd.key, "discarding stale display update");
            return false;
        }

        let Some(surface) = cmd.surface.upgrade() else {
            // Surface died without reassignment; drop its tracker entry too.
            self.tracker.release(cmd.token);
            return false;
        };

        match cmd.image {
            Some(image) => surface.apply_image(image),
            None => surface.apply_placeholder(cmd.placeholder),
        }
        true
    }
}

impl std::fmt::Debug for DisplayQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayQueue").finish_non_exhaustive()
    }
}
