//! # Pipeline Driver
//!
//! This module coordinates the whole serving path, per event and per
//! window close:
//! 1. Normalize the raw event (skip-and-log on malformed payloads)
//! 2. Route the record into its group's current window
//! 3. On the window tick, close every window whose boundary elapsed
//! 4. For each closed window: look up candidates, score, publish
//!
//! Failure contract: nothing here is fatal. A failed lookup publishes an
//! empty list for that group (the next window retries naturally); a failed
//! publish is logged and the remaining groups proceed; still-open windows
//! are discarded on shutdown, never partially scored.
//!
//! ## Learning Goals
//!
//! This component teaches you:
//! - Async coordination with tokio::select!
//! - Sharing trait-object handles with Arc
//! - Error handling across async boundaries
//! - Instrumentation with tracing
//! - Combining multiple components into a pipeline

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use clients::{CandidateLookup, LookupQuery, RecommendationSink};
use events::{normalize, AggregatedPreference, GroupId, RawEvent};
use scoring::rank;
use windowing::{WindowKey, WindowSet};

/// Milliseconds since the epoch; the clock the windows are bucketed on.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Orchestrates normalizer -> windows -> scoring and dispatches results to
/// the publish boundary.
///
/// The lookup and sink handles are injected rather than global, so tests
/// run the full path against in-memory fakes.
pub struct PipelineDriver {
    window: Duration,
    top_k: usize,
    windows: WindowSet,
    /// Last-known location per group, updated on every normalized record.
    locations: HashMap<GroupId, String>,
    lookup: Arc<dyn CandidateLookup>,
    sink: Arc<dyn RecommendationSink>,
}

impl PipelineDriver {
    pub fn new(
        window: Duration,
        top_k: usize,
        lookup: Arc<dyn CandidateLookup>,
        sink: Arc<dyn RecommendationSink>,
    ) -> Self {
        Self {
            window,
            top_k,
            windows: WindowSet::new(window.as_millis() as u64),
            locations: HashMap::new(),
            lookup,
            sink,
        }
    }

    /// Normalize one raw event and buffer it into its window.
    ///
    /// Malformed events are dropped here; they never abort the pipeline.
    pub fn handle_event(&mut self, raw: RawEvent, now_ms: u64) {
        let record = match normalize(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("Dropping malformed event: {}", e);
                return;
            }
        };

        self.locations
            .insert(record.group_id.clone(), record.location.clone());
        let key = self.windows.observe(record, now_ms);
        debug!(
            "Buffered event for group {} into slice {}",
            key.group_id, key.start_ms
        );
    }

    /// Close every window whose boundary elapsed and run each aggregate
    /// through lookup, scoring, and publish.
    pub async fn tick(&mut self, now_ms: u64) {
        for (key, aggregate) in self.windows.close_due(now_ms) {
            self.process_window(&key, aggregate).await;
        }
    }

    /// Run the event loop until the source closes or shutdown is signaled.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<RawEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let mut ticker = tokio::time::interval(self.window);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Pipeline started ({}s windows, top-{})",
            self.window.as_secs(),
            self.top_k
        );

        loop {
            tokio::select! {
                maybe_event = events.recv() => {
                    match maybe_event {
                        Some(raw) => self.handle_event(raw, now_ms()),
                        None => {
                            info!("Event source closed, shutting down");
                            break;
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.tick(now_ms()).await;
                }
                _ = shutdown.changed() => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        let discarded = self.windows.discard_all();
        if discarded > 0 {
            info!("Discarded {} open windows on shutdown", discarded);
        }
        Ok(())
    }

    /// Lookup, score, publish for one closed window.
    async fn process_window(&self, key: &WindowKey, aggregate: AggregatedPreference) {
        let group_id = key.group_id.as_str();

        let recs = match self.locations.get(group_id) {
            Some(location) => {
                let query = LookupQuery {
                    cuisines: aggregate.top_cuisines.clone(),
                    dietary: aggregate.dietary_restrictions.iter().cloned().collect(),
                    budget_level: aggregate.budget_level,
                    location: location.clone(),
                };
                match self.lookup.lookup(&query).await {
                    Ok(candidates) => {
                        if candidates.is_empty() {
                            info!("Lookup returned no candidates for group {}", group_id);
                        }
                        rank(&aggregate, candidates, self.top_k)
                    }
                    Err(e) => {
                        // the next window for this group retries naturally
                        warn!("Candidate lookup failed for group {}: {}", group_id, e);
                        Vec::new()
                    }
                }
            }
            None => {
                warn!("No known location for group {}", group_id);
                Vec::new()
            }
        };

        info!(
            "Publishing {} recommendations for group {}",
            recs.len(),
            group_id
        );
        if let Err(e) = self.sink.publish(group_id, &recs).await {
            error!(
                "Failed to publish recommendations for group {}: {}",
                group_id, e
            );
        }
    }
}
