//! Event Normalizer: raw key/value payloads into canonical records.
//!
//! Incoming events arrive as flat key/value maps with the `cuisines` and
//! `dietary` fields JSON-encoded inside them. Normalization decodes those
//! sub-payloads, maps the budget symbol, and produces an immutable
//! [`PreferenceRecord`].
//!
//! Failure semantics: a malformed event fails the single record and nothing
//! else. Callers skip-and-log; the pipeline never aborts on bad input.
//!
//! Rust concepts you'll learn here:
//! - Error handling with the `?` operator
//! - Converting between owned and borrowed strings
//! - Iterator adapters (map/filter/collect)
//! - Decoding JSON into typed collections with serde

use crate::error::{NormalizeError, Result};
use crate::types::{Budget, PreferenceRecord, RawEvent};
use std::collections::{BTreeSet, HashSet};

/// Convert a raw event into a canonical preference record.
///
/// Contract:
/// - `userId`, `groupId`, and `location` are required; absence fails the
///   record.
/// - `cuisines`/`dietary` are JSON arrays of strings; a missing or empty
///   field yields an empty collection, an undecodable one fails the record.
/// - `budget` maps "$"/"$$"/"$$$" to a tier; anything else is treated as
///   missing rather than an error.
///
/// Pure transformation: no side effects.
pub fn normalize(raw: &RawEvent) -> Result<PreferenceRecord> {
    let user_id = require(raw, "userId")?;
    let group_id = require(raw, "groupId")?;
    let location = require(raw, "location")?;

    let cuisines = decode_list(raw, "cuisines")?;
    let dietary: BTreeSet<String> = decode_list(raw, "dietary")?.into_iter().collect();

    let budget = raw.get("budget").and_then(|s| Budget::from_symbol(s.trim()));

    Ok(PreferenceRecord {
        user_id,
        group_id,
        cuisines: dedup_in_order(cuisines),
        dietary,
        budget,
        location,
    })
}

fn require(raw: &RawEvent, field: &'static str) -> Result<String> {
    match raw.get(field).map(|s| s.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(NormalizeError::MissingField { field }),
    }
}

/// Decode a JSON-encoded array of strings, lowercased and trimmed.
fn decode_list(raw: &RawEvent, field: &'static str) -> Result<Vec<String>> {
    let encoded = match raw.get(field) {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Ok(Vec::new()),
    };

    let values: Vec<String> =
        serde_json::from_str(encoded).map_err(|e| NormalizeError::MalformedField {
            field,
            reason: e.to_string(),
        })?;

    Ok(values
        .into_iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect())
}

/// Drop duplicates while keeping the first occurrence, so the aggregator's
/// first-seen tie-break stays deterministic.
fn dedup_in_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
