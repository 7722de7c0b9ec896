//! Redis-backed recommendation sink.
//!
//! Each group's latest ranked list is stored as one field of a Redis hash
//! (`HSET group_recs <group_id> <json>`), so serving is a single HGET by
//! group. Re-publishing a group overwrites the previous list; no history
//! is retained.

use crate::error::PublishError;
use crate::traits::RecommendationSink;
use async_trait::async_trait;
use events::ScoredCandidate;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

#[derive(Clone)]
pub struct RedisSink {
    conn: ConnectionManager,
    hash_key: String,
}

impl RedisSink {
    /// Connect to `redis_url` and publish under `hash_key`.
    pub async fn connect(
        redis_url: &str,
        hash_key: impl Into<String>,
    ) -> Result<Self, PublishError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self {
            conn,
            hash_key: hash_key.into(),
        })
    }
}

#[async_trait]
impl RecommendationSink for RedisSink {
    async fn publish(&self, group_id: &str, recs: &[ScoredCandidate]) -> Result<(), PublishError> {
        let payload = serde_json::to_string(recs).map_err(|e| PublishError::Serialize {
            group_id: group_id.to_string(),
            reason: e.to_string(),
        })?;

        let mut conn = self.conn.clone();
        let _: () = conn.hset(&self.hash_key, group_id, payload).await?;

        debug!(
            "Published {} recommendations for group {}",
            recs.len(),
            group_id
        );
        Ok(())
    }
}
