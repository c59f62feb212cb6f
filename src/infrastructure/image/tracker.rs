//! Tracking of the request currently assigned to each display surface.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::trace;

use crate::domain::entities::RequestKey;
use crate::domain::ports::SurfaceToken;

/// Records which request each live surface is currently assigned to.
///
/// Surfaces in scrolling lists are recycled constantly; overwriting a token's
/// entry is exactly what invalidates every in-flight load for the token's
/// previous request. Checks against this map substitute for hard
/// cancellation: expensive work in flight is never aborted, its result is
/// simply discarded when found stale.
///
/// The tracker holds no surface references, only identity tokens, so it can
/// never keep a surface alive. Entries whose surface has been dropped are
/// released when the display queue discovers the dead reference.
#[derive(Debug, Default)]
pub struct ReuseTracker {
    entries: Mutex<HashMap<SurfaceToken, RequestKey>>,
}

impl ReuseTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `token` is now assigned to `key`, superseding any
    /// previous assignment.
    pub fn assign(&self, token: SurfaceToken, key: RequestKey) {
        trace!(token = %token, key = %key, "surface assigned");
        self.entries.lock().insert(token, key);
    }

    /// Returns true if `key` is no longer what `token` is assigned to.
    /// A token with no entry counts as stale.
    #[must_use]
    pub fn is_stale(&self, token: SurfaceToken, key: &RequestKey) -> bool {
        self.entries.lock().get(&token) != Some(key)
    }

    /// Drops the entry for a surface that no longer exists.
    pub fn release(&self, token: SurfaceToken) {
        if self.entries.lock().remove(&token).is_some() {
            trace!(token = %token, "surface released");
        }
    }

    /// Number of tracked surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if no surface is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SizeClass;

    fn key(url: &str) -> RequestKey {
        RequestKey::new(url, SizeClass::SlideList)
    }

    #[test]
    fn current_assignment_is_fresh() {
        let tracker = ReuseTracker::new();
        let token = SurfaceToken(1);

        tracker.assign(token, key("a"));
        assert!(!tracker.is_stale(token, &key("a")));
    }

    #[test]
    fn reassignment_invalidates_previous_request() {
        let tracker = ReuseTracker::new();
        let token = SurfaceToken(1);

        tracker.assign(token, key("a"));
        tracker.assign(token, key("b"));

        assert!(tracker.is_stale(token, &key("a")));
        assert!(!tracker.is_stale(token, &key("b")));
    }

    #[test]
    fn unknown_token_counts_as_stale() {
        let tracker = ReuseTracker::new();
        assert!(tracker.is_stale(SurfaceToken(9), &key("a")));
    }

    #[test]
    fn same_url_different_size_class_is_stale() {
        let tracker = ReuseTracker::new();
        let token = SurfaceToken(1);

        tracker.assign(token, RequestKey::new("a", SizeClass::Document));
        assert!(tracker.is_stale(token, &RequestKey::new("a", SizeClass::SlideList)));
    }

    #[test]
    fn release_forgets_the_surface() {
        let tracker = ReuseTracker::new();
        let token = SurfaceToken(1);

        tracker.assign(token, key("a"));
        tracker.release(token);

        assert!(tracker.is_empty());
        assert!(tracker.is_stale(token, &key("a")));
    }
}
