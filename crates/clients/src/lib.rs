//! External-service clients for the group dining pipeline.
//!
//! This crate owns the pipeline's two collaborator boundaries plus the
//! event transport adapter:
//! - Candidate lookup: an HTTP service queried by cuisine/dietary/budget/
//!   location, returning raw restaurant candidates
//! - Recommendation publish: a Redis hash holding each group's latest
//!   ranked list (last-write-wins)
//! - Event source: a Redis stream tailed for raw preference events
//!
//! The driver only ever sees the [`CandidateLookup`] and
//! [`RecommendationSink`] traits; concrete clients are constructed at the
//! edge and injected as handles, never held as process-wide globals.

pub mod categories;
pub mod error;
pub mod lookup;
pub mod publish;
pub mod source;
pub mod traits;

// Re-export commonly used types
pub use error::{LookupError, PublishError, SourceError};
pub use lookup::HttpLookupClient;
pub use publish::RedisSink;
pub use source::RedisEventSource;
pub use traits::{CandidateLookup, LookupQuery, RecommendationSink};
