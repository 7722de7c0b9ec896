//! Per-group window state machine and window bookkeeping.
//!
//! A window is the unit of aggregation and scoring: all records for one
//! group that arrived within one time slice. The state machine makes the
//! close semantics explicit instead of leaving them implicit in a callback
//! chain: OPEN windows accept records, CLOSING windows admit nothing new,
//! CLOSED windows have emitted their aggregate exactly once.

use crate::aggregate::aggregate;
use events::{AggregatedPreference, GroupId, PreferenceRecord};
use std::collections::HashMap;
use tracing::debug;

/// Identity of one window: the group plus the epoch-aligned start of its
/// time slice, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowKey {
    pub group_id: GroupId,
    pub start_ms: u64,
}

/// Lifecycle of a window. Transitions are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Accepting records
    Open,
    /// Boundary reached; no new records admitted
    Closing,
    /// Aggregate computed and emitted
    Closed,
}

/// A time-bounded, append-only batch of records for one group.
///
/// The record collection is exclusively owned by the window and never
/// mutated after the transition out of OPEN, so no locking is needed as
/// long as one window is finalized before anything else reads it.
#[derive(Debug)]
pub struct Window {
    records: Vec<PreferenceRecord>,
    state: WindowState,
}

impl Window {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            state: WindowState::Open,
        }
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Append a record. Returns false (and drops the record) once the
    /// window has left OPEN.
    pub fn push(&mut self, record: PreferenceRecord) -> bool {
        if self.state != WindowState::Open {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Stop admitting records without computing the aggregate yet.
    pub fn seal(&mut self) {
        if self.state == WindowState::Open {
            self.state = WindowState::Closing;
        }
    }

    /// Compute the aggregate and transition to CLOSED.
    ///
    /// Returns `None` for an empty window, and `None` on any call after
    /// the first: a window is scored at most once.
    pub fn close(&mut self) -> Option<AggregatedPreference> {
        if self.state == WindowState::Closed {
            return None;
        }
        self.state = WindowState::Closed;
        let records = std::mem::take(&mut self.records);
        aggregate(&records)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

/// Assigns records to windows and drains windows whose boundary elapsed.
///
/// Windows are keyed by (group, start) where start is the arrival time
/// truncated to the window length: fixed, epoch-aligned slices, so every
/// record belongs to exactly one window.
#[derive(Debug)]
pub struct WindowSet {
    window_ms: u64,
    windows: HashMap<WindowKey, Window>,
}

impl WindowSet {
    /// Create an empty set with the given window length in milliseconds.
    pub fn new(window_ms: u64) -> Self {
        assert!(window_ms > 0, "window length must be non-zero");
        Self {
            window_ms,
            windows: HashMap::new(),
        }
    }

    /// Number of windows currently held (open or sealed, not yet drained).
    pub fn live_windows(&self) -> usize {
        self.windows.len()
    }

    /// Route one record into its window, creating the window on first
    /// sight of the (group, slice) pair.
    pub fn observe(&mut self, record: PreferenceRecord, now_ms: u64) -> WindowKey {
        let start_ms = now_ms - now_ms % self.window_ms;
        let key = WindowKey {
            group_id: record.group_id.clone(),
            start_ms,
        };
        self.windows
            .entry(key.clone())
            .or_insert_with(Window::new)
            .push(record);
        key
    }

    /// Seal and close every window whose slice has fully elapsed.
    ///
    /// Closed windows are removed from the set; empty windows are dropped
    /// without producing an aggregate. Results come out in (start, group)
    /// order so a given set of due windows always drains the same way.
    pub fn close_due(&mut self, now_ms: u64) -> Vec<(WindowKey, AggregatedPreference)> {
        let mut due: Vec<WindowKey> = self
            .windows
            .keys()
            .filter(|key| key.start_ms + self.window_ms <= now_ms)
            .cloned()
            .collect();
        due.sort_by(|a, b| {
            a.start_ms
                .cmp(&b.start_ms)
                .then_with(|| a.group_id.cmp(&b.group_id))
        });

        let mut closed = Vec::new();
        for key in due {
            if let Some(mut window) = self.windows.remove(&key) {
                window.seal();
                let records = window.record_count();
                match window.close() {
                    Some(aggregate) => {
                        debug!(
                            "Closed window for group {} (slice {}, {} records)",
                            key.group_id, key.start_ms, records
                        );
                        closed.push((key, aggregate));
                    }
                    None => {
                        debug!(
                            "Dropped empty window for group {} (slice {})",
                            key.group_id, key.start_ms
                        );
                    }
                }
            }
        }
        closed
    }

    /// Drop every remaining window without scoring it.
    ///
    /// Shutdown path: a window still open when the process is asked to
    /// stop is discarded, never partially scored.
    pub fn discard_all(&mut self) -> usize {
        let discarded = self.windows.len();
        self.windows.clear();
        discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::Budget;

    fn record(group: &str, cuisines: &[&str]) -> PreferenceRecord {
        PreferenceRecord {
            user_id: "u1".to_string(),
            group_id: group.to_string(),
            cuisines: cuisines.iter().map(|c| c.to_string()).collect(),
            dietary: Default::default(),
            budget: Some(Budget::Medium),
            location: "downtown".to_string(),
        }
    }

    #[test]
    fn test_push_rejected_after_seal() {
        let mut window = Window::new();

        assert!(window.push(record("g1", &["thai"])));
        window.seal();
        assert_eq!(window.state(), WindowState::Closing);
        assert!(!window.push(record("g1", &["thai"])));
        assert_eq!(window.record_count(), 1);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut window = Window::new();
        window.push(record("g1", &["thai"]));

        let first = window.close();
        assert!(first.is_some());
        assert_eq!(window.state(), WindowState::Closed);

        // a window is scored at most once
        assert!(window.close().is_none());
    }

    #[test]
    fn test_empty_window_closes_to_nothing() {
        let mut window = Window::new();
        assert!(window.close().is_none());
    }

    #[test]
    fn test_observe_buckets_by_group_and_slice() {
        let mut windows = WindowSet::new(5_000);

        let a = windows.observe(record("g1", &["thai"]), 1_000);
        let b = windows.observe(record("g1", &["thai"]), 4_000);
        let c = windows.observe(record("g2", &["thai"]), 4_000);
        let d = windows.observe(record("g1", &["thai"]), 6_000);

        assert_eq!(a, b, "same group and slice share one window");
        assert_ne!(a, c, "different groups get different windows");
        assert_ne!(a, d, "a later slice gets a fresh window");
        assert_eq!(windows.live_windows(), 3);
    }

    #[test]
    fn test_close_due_only_drains_elapsed_slices() {
        let mut windows = WindowSet::new(5_000);
        windows.observe(record("g1", &["thai"]), 1_000);
        windows.observe(record("g2", &["thai"]), 6_000);

        // at t=5000 only g1's [0, 5000) slice has fully elapsed
        let closed = windows.close_due(5_000);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].0.group_id, "g1");
        assert_eq!(windows.live_windows(), 1);

        let closed = windows.close_due(10_000);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].0.group_id, "g2");
        assert_eq!(windows.live_windows(), 0);
    }

    #[test]
    fn test_close_due_drains_in_deterministic_order() {
        let mut windows = WindowSet::new(5_000);
        windows.observe(record("g2", &["thai"]), 1_000);
        windows.observe(record("g1", &["thai"]), 1_000);
        windows.observe(record("g3", &["thai"]), 6_000);

        let closed = windows.close_due(20_000);
        let order: Vec<&str> = closed.iter().map(|(k, _)| k.group_id.as_str()).collect();
        assert_eq!(order, vec!["g1", "g2", "g3"]);
    }

    #[test]
    fn test_discard_all_drops_windows_unscored() {
        let mut windows = WindowSet::new(5_000);
        windows.observe(record("g1", &["thai"]), 1_000);
        windows.observe(record("g2", &["thai"]), 1_000);

        assert_eq!(windows.discard_all(), 2);
        assert_eq!(windows.live_windows(), 0);
        assert!(windows.close_due(60_000).is_empty());
    }
}
