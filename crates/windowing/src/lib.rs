//! Micro-batch windowing for group preference records.
//!
//! This crate provides:
//! - `Window`: a time-bounded, append-only batch of records for one group,
//!   with an explicit OPEN -> CLOSING -> CLOSED state machine
//! - `WindowSet`: assignment of incoming records to epoch-aligned windows
//!   and draining of windows whose boundary has elapsed
//! - `aggregate`: the collapse of one window into an `AggregatedPreference`
//!
//! ## Architecture
//! Records are bucketed by arrival time truncated to the window length, so
//! every (group, time slice) pair owns exactly one window. The driver ticks
//! on the window cadence and drains whatever is due; a window that is still
//! open at shutdown is discarded without scoring.
//!
//! ## Example Usage
//! ```ignore
//! let mut windows = WindowSet::new(5_000);
//!
//! windows.observe(record, now_ms);
//! for (key, aggregate) in windows.close_due(now_ms) {
//!     // fetch candidates, score, publish
//! }
//! ```

pub mod aggregate;
pub mod window;

// Re-export main types
pub use aggregate::aggregate;
pub use window::{Window, WindowKey, WindowSet, WindowState};
