//! HTTP client for the restaurant candidate lookup service.
//!
//! Issues `GET {base_url}?categories=...&dietary=...&price=...&location=...`
//! and expects a JSON array of candidate records. The service filters
//! loosely; fine-grained ranking happens downstream in scoring.

use crate::categories::expand_categories;
use crate::error::LookupError;
use crate::traits::{CandidateLookup, LookupQuery};
use async_trait::async_trait;
use events::CandidateRestaurant;
use tracing::debug;

pub struct HttpLookupClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLookupClient {
    /// Create a client for the lookup endpoint (e.g.
    /// "http://localhost:8080/candidates").
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CandidateLookup for HttpLookupClient {
    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<CandidateRestaurant>, LookupError> {
        let categories = expand_categories(&query.cuisines).join(",");
        let dietary = query.dietary.join(",");
        let price = query.budget_level.to_string();

        debug!(
            "Looking up candidates near {} (categories: {})",
            query.location, categories
        );

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("categories", categories.as_str()),
                ("dietary", dietary.as_str()),
                ("price", price.as_str()),
                ("location", query.location.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let candidates: Vec<CandidateRestaurant> = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;

        debug!("Lookup returned {} candidates", candidates.len());
        Ok(candidates)
    }
}
