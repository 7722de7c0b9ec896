//! Environment-driven pipeline configuration.
//!
//! The pipeline is configured from the environment, not the command line:
//! window length, top-K, and the external service endpoints.

use anyhow::{ensure, Context, Result};
use std::env;
use std::time::Duration;

/// Default micro-batch window length in seconds.
const DEFAULT_WINDOW_SECS: u64 = 5;

/// Default number of ranked candidates kept per group per window.
const DEFAULT_TOP_K: usize = 10;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_EVENT_STREAM: &str = "preferences";
const DEFAULT_RECS_KEY: &str = "group_recs";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Micro-batch window length.
    pub window: Duration,
    /// Ranked candidates kept per group per window.
    pub top_k: usize,
    /// Redis endpoint for both the event stream and the publish target.
    pub redis_url: String,
    /// Candidate lookup service endpoint.
    pub lookup_url: String,
    /// Stream the raw preference events arrive on.
    pub event_stream: String,
    /// Hash key the recommendation lists are published under.
    pub recs_key: String,
}

impl PipelineConfig {
    /// Read the configuration from the environment.
    ///
    /// `LOOKUP_URL` is required; everything else has a default:
    /// `WINDOW_SECS` (5), `TOP_K` (10), `REDIS_URL`
    /// (redis://127.0.0.1:6379), `EVENT_STREAM` (preferences),
    /// `RECS_KEY` (group_recs).
    pub fn from_env() -> Result<Self> {
        let window_secs: u64 = parse_var("WINDOW_SECS", DEFAULT_WINDOW_SECS)?;
        ensure!(window_secs > 0, "WINDOW_SECS must be at least 1");

        let top_k: usize = parse_var("TOP_K", DEFAULT_TOP_K)?;

        let lookup_url = env::var("LOOKUP_URL").context("LOOKUP_URL must be set")?;

        Ok(Self {
            window: Duration::from_secs(window_secs),
            top_k,
            redis_url: var_or("REDIS_URL", DEFAULT_REDIS_URL),
            lookup_url,
            event_stream: var_or("EVENT_STREAM", DEFAULT_EVENT_STREAM),
            recs_key: var_or("RECS_KEY", DEFAULT_RECS_KEY),
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
