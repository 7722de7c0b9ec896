//! Redis stream event source.
//!
//! Tails the preference stream with blocking XREAD and forwards each
//! entry's field map to the pipeline as a [`RawEvent`]. No consumer group
//! and no acknowledgement: the pipeline makes no exactly-once promise, and
//! an event lost between read and normalize is simply absent from its
//! window.

use crate::error::SourceError;
use events::RawEvent;
use redis::aio::ConnectionManager;
use redis::streams::{StreamId, StreamReadOptions, StreamReadReply};
use redis::AsyncCommands;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// How long one XREAD blocks before re-polling, in milliseconds.
const BLOCK_MS: usize = 1_000;

/// Max entries fetched per XREAD.
const READ_COUNT: usize = 128;

pub struct RedisEventSource {
    conn: ConnectionManager,
    stream: String,
}

impl RedisEventSource {
    /// Connect to `redis_url` and tail the given stream.
    pub async fn connect(
        redis_url: &str,
        stream: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self {
            conn,
            stream: stream.into(),
        })
    }

    /// Tail the stream, forwarding events until the receiving side hangs
    /// up. Starts at `$`: only events arriving after startup are consumed.
    pub async fn run(mut self, tx: mpsc::Sender<RawEvent>) -> Result<(), SourceError> {
        let mut last_id = "$".to_string();
        let options = StreamReadOptions::default()
            .block(BLOCK_MS)
            .count(READ_COUNT);

        loop {
            let reply: StreamReadReply = self
                .conn
                .xread_options(&[self.stream.as_str()], &[last_id.as_str()], &options)
                .await?;

            for stream_key in reply.keys {
                for entry in stream_key.ids {
                    last_id = entry.id.clone();
                    if tx.send(to_raw_event(&entry)).await.is_err() {
                        debug!("Event channel closed, stopping stream reader");
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Flatten one stream entry's field map into a raw event. Non-string
/// fields are dropped with a warning; the normalizer decides whether what
/// remains still makes a valid record.
fn to_raw_event(entry: &StreamId) -> RawEvent {
    let mut event = RawEvent::new();
    for (field, value) in &entry.map {
        match redis::from_redis_value::<String>(value) {
            Ok(decoded) => {
                event.insert(field.clone(), decoded);
            }
            Err(e) => {
                warn!(
                    "Dropping non-string field {} in stream entry {}: {}",
                    field, entry.id, e
                );
            }
        }
    }
    event
}
