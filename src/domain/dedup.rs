//! Short-window suppression of repeated clicks.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Clicks on the same link closer together than this are recorded once.
pub const DEFAULT_SUPPRESS_WINDOW: Duration = Duration::from_millis(2000);

/// Entries older than this are dropped on the next admission.
pub const DEFAULT_EVICT_AFTER: Duration = Duration::from_millis(5000);

/// Process-local map of link id to the time its last click was admitted.
///
/// Never persisted. Eviction is amortized over admissions rather than driven
/// by a timer, so the map holds roughly the links clicked within the last
/// `evict_after`.
#[derive(Debug)]
pub struct DedupWindow {
    suppress: Duration,
    evict_after: Duration,
    entries: Mutex<HashMap<i64, Instant>>,
}

impl DedupWindow {
    pub fn new(suppress: Duration, evict_after: Duration) -> Self {
        Self {
            suppress,
            evict_after,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Decides whether a click on `key` should be recorded now.
    pub fn admit(&self, key: i64) -> bool {
        self.admit_at(key, Instant::now())
    }

    /// Decides whether a click on `key` at `now` should be recorded.
    ///
    /// A suppressed click leaves the stored timestamp untouched. An admitted
    /// click stores `now` and evicts every entry older than `evict_after`.
    pub fn admit_at(&self, key: i64, now: Instant) -> bool {
        let mut entries = self.lock();

        if let Some(&last) = entries.get(&key)
            && now.saturating_duration_since(last) < self.suppress
        {
            return false;
        }

        entries.insert(key, now);

        let evict_after = self.evict_after;
        entries.retain(|_, &mut seen| now.saturating_duration_since(seen) <= evict_after);

        true
    }

    pub fn contains(&self, key: i64) -> bool {
        self.lock().contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, Instant>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DedupWindow {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPRESS_WINDOW, DEFAULT_EVICT_AFTER)
    }
}
