//! Collapse one window's records into an aggregated preference summary.

use events::{AggregatedPreference, PreferenceRecord};
use std::collections::BTreeSet;

/// How many cuisines the majority vote keeps.
const TOP_CUISINES: usize = 3;

/// Budget level assumed when no record in the window carried one.
const DEFAULT_BUDGET_LEVEL: u8 = 2;

/// Collapse the records of one window.
///
/// Returns `None` for an empty window: those are dropped and must never
/// reach scoring.
///
/// ## Algorithm
/// - top_cuisines: occurrence counts across all records, three highest,
///   ties broken by first appearance in the window (stable, not
///   score-based)
/// - dietary_restrictions: set union of the non-empty dietary sets
/// - budget_level: median of the mapped budgets, half-up rounding, clamped
///   to 1..=3; 2 when no record had a valid mapping
///
/// Never fails on individual records: malformed events were already
/// filtered by the normalizer.
pub fn aggregate(records: &[PreferenceRecord]) -> Option<AggregatedPreference> {
    if records.is_empty() {
        return None;
    }

    Some(AggregatedPreference {
        top_cuisines: top_cuisines(records),
        dietary_restrictions: dietary_union(records),
        budget_level: median_budget(records),
    })
}

/// Majority vote over every cuisine mention in the window.
///
/// Counts are accumulated in first-seen order and the sort is stable, so
/// equal counts stay in that order: the same record sequence always gives
/// the same output.
fn top_cuisines(records: &[PreferenceRecord]) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        for cuisine in &record.cuisines {
            match counts.iter_mut().find(|(name, _)| name == cuisine) {
                Some((_, count)) => *count += 1,
                None => counts.push((cuisine.clone(), 1)),
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_CUISINES)
        .map(|(name, _)| name)
        .collect()
}

fn dietary_union(records: &[PreferenceRecord]) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|record| record.dietary.iter().cloned())
        .collect()
}

/// Median of the numerically mapped budgets.
///
/// Even-length medians round half up, so [1, 2] lands on 2.
fn median_budget(records: &[PreferenceRecord]) -> u8 {
    let mut levels: Vec<u8> = records
        .iter()
        .filter_map(|record| record.budget.map(|b| b.level()))
        .collect();
    if levels.is_empty() {
        return DEFAULT_BUDGET_LEVEL;
    }
    levels.sort_unstable();

    let mid = levels.len() / 2;
    let median = if levels.len() % 2 == 1 {
        levels[mid]
    } else {
        (levels[mid - 1] + levels[mid] + 1) / 2
    };
    median.clamp(1, 3)
}
