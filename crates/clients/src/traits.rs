//! Boundary traits for the pipeline's external collaborators.
//!
//! The driver talks to the candidate lookup and the recommendation sink
//! through these traits only; the concrete clients in this crate and the
//! in-memory fakes in the pipeline tests both implement them.

use crate::error::{LookupError, PublishError};
use async_trait::async_trait;
use events::{CandidateRestaurant, ScoredCandidate};

/// Query sent to the candidate lookup service, derived from one window's
/// aggregate plus the group's last-known location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub cuisines: Vec<String>,
    pub dietary: Vec<String>,
    /// Aggregated budget level, 1-3.
    pub budget_level: u8,
    pub location: String,
}

/// The restaurant candidate lookup boundary.
///
/// May fail (network, timeout); failure must never propagate as a pipeline
/// abort. The caller publishes an empty list and moves on.
#[async_trait]
pub trait CandidateLookup: Send + Sync {
    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<CandidateRestaurant>, LookupError>;
}

/// The recommendation publish boundary.
///
/// Makes `recs` the latest recommendation for `group_id`, overwriting any
/// prior value: last-write-wins, no history retained.
#[async_trait]
pub trait RecommendationSink: Send + Sync {
    async fn publish(&self, group_id: &str, recs: &[ScoredCandidate]) -> Result<(), PublishError>;
}
