//! Errors at the external-service boundaries.
//!
//! None of these are fatal to the pipeline: a failed lookup degrades to an
//! empty recommendation list, a failed publish is surfaced to the operator
//! and the next window carries on.

use thiserror::Error;

/// Errors from the candidate lookup service
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("lookup returned an undecodable body: {0}")]
    Decode(String),
}

/// Errors from the recommendation publish target
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to serialize recommendations for group {group_id}: {reason}")]
    Serialize { group_id: String, reason: String },

    #[error("redis write failed: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Errors from the event stream source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("redis read failed: {0}")]
    Redis(#[from] redis::RedisError),
}
