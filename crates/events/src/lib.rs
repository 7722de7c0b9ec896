//! # Events Crate
//!
//! Domain types and event normalization for the group dining pipeline.
//!
//! ## Components
//!
//! ### Types
//! The shared vocabulary of the system: [`PreferenceRecord`],
//! [`AggregatedPreference`], [`CandidateRestaurant`], [`ScoredCandidate`].
//!
//! ### Normalizer
//! [`normalize`] converts a raw key/value payload (as delivered by the
//! event transport) into a canonical, strongly-typed preference record:
//! JSON-encoded cuisine/dietary sub-payloads are decoded into collections,
//! and the "$"-symbol budget notation is mapped to a numeric tier.
//!
//! ## Example Usage
//!
//! ```ignore
//! use events::{normalize, RawEvent};
//!
//! let record = match normalize(&raw) {
//!     Ok(record) => record,
//!     Err(e) => {
//!         tracing::warn!("Dropping malformed event: {}", e);
//!         return;
//!     }
//! };
//! ```

pub mod error;
pub mod normalize;
pub mod types;

// Re-export commonly used items
pub use error::NormalizeError;
pub use normalize::normalize;
pub use types::{
    AggregatedPreference, Budget, CandidateRestaurant, GroupId, PreferenceRecord, RawEvent,
    ScoredCandidate, UserId,
};
