//! Core domain types for the group dining pipeline.
//!
//! This module defines the data structures shared by every stage:
//! the raw event shape, the canonical preference record, the per-window
//! aggregate, and the candidate/recommendation types exchanged with the
//! external lookup and publish boundaries.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (UserId, GroupId)
//! - Enums for fixed sets of values
//! - Derive macros for common traits
//! - `Option<T>` for fields that may legitimately be absent

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with group IDs

/// Unique identifier for a user
pub type UserId = String;

/// Unique identifier for a dining group
pub type GroupId = String;

/// Raw incoming preference event: one untyped key/value payload, exactly as
/// the transport delivers it (e.g. the field map of a Redis stream entry).
/// Consumed once by [`normalize`](crate::normalize::normalize).
pub type RawEvent = HashMap<String, String>;

// =============================================================================
// Preference Types
// =============================================================================

/// Three-tier budget notation as submitted by users ("$", "$$", "$$$").
///
/// Rust concept: Enums can represent discrete categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Budget {
    Low,
    Medium,
    High,
}

impl Budget {
    /// Map the symbolic notation to a budget tier.
    ///
    /// Unmapped symbols yield `None`: they are excluded from aggregation
    /// downstream rather than defaulted here.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "$" => Some(Budget::Low),
            "$$" => Some(Budget::Medium),
            "$$$" => Some(Budget::High),
            _ => None,
        }
    }

    /// Numeric level (1-3) used by aggregation and scoring.
    pub fn level(self) -> u8 {
        match self {
            Budget::Low => 1,
            Budget::Medium => 2,
            Budget::High => 3,
        }
    }
}

/// One user's normalized dining preferences for one group.
///
/// Immutable once constructed; owned solely by the window it falls into.
///
/// Rust concepts:
/// - `#[derive(Debug, Clone)]` automatically implements these traits
/// - `pub` makes fields accessible outside this module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceRecord {
    pub user_id: UserId,
    pub group_id: GroupId,
    /// Distinct cuisines in payload order. The order matters: the
    /// aggregator breaks majority-vote ties by first appearance, so the
    /// in-record order must survive normalization.
    pub cuisines: Vec<String>,
    pub dietary: BTreeSet<String>,
    /// Budget tier mapped from the event's symbol.
    ///
    /// Rust concept: `Option<T>` represents a value that may or may not exist
    /// - `Some(tier)` means the symbol mapped cleanly
    /// - `None` means the event carried no mappable budget symbol
    pub budget: Option<Budget>,
    pub location: String,
}

/// Collapsed summary of one group's preferences for one window.
///
/// Built once per window close, then discarded after scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedPreference {
    /// Up to three cuisines by majority vote, ties broken by first
    /// appearance in the window.
    pub top_cuisines: Vec<String>,
    /// Union of all non-empty dietary sets in the window.
    pub dietary_restrictions: BTreeSet<String>,
    /// Median of the mapped budgets, rounded half-up, clamped to 1..=3.
    /// 2 when no record in the window carried a valid budget.
    pub budget_level: u8,
}

// =============================================================================
// Candidate Types
// =============================================================================

/// A restaurant record as returned by the external candidate lookup.
///
/// Read-only input to scoring; the lookup service has already filtered
/// loosely by cuisine/dietary/budget/location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRestaurant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Absent on some providers; scoring substitutes level 2.
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub dietary_flags: BTreeSet<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub address: Option<String>,
}

/// A candidate together with its rank score, in the shape published for
/// serving: the candidate fields flattened alongside `score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: CandidateRestaurant,
    /// Deterministic match score; may be negative.
    pub score: i32,
}
