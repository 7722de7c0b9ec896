//! # Scoring Crate
//!
//! Candidate scoring and ranking: the algorithmic heart of the pipeline.
//!
//! Given one window's [`AggregatedPreference`] and the raw candidates the
//! external lookup returned, produce a rank-ordered top-K list. Candidates
//! arrive loosely pre-filtered by the lookup service; scoring re-ranks
//! regardless to get a fine-grained, explainable order.
//!
//! ## Scoring function
//! For candidate `r` against aggregate `a`:
//! - `+2` per category of `r` also present in `a.top_cuisines`
//! - `+1` if `r.price_level` (2 when absent) equals `a.budget_level`
//! - minus the size of the symmetric difference between `r.dietary_flags`
//!   and `a.dietary_restrictions`
//!
//! The sum may be negative. Scores are raw integer sums with no
//! normalization for candidate-set size.

use events::{AggregatedPreference, CandidateRestaurant, ScoredCandidate};
use rayon::prelude::*;
use tracing::debug;

/// Price level assumed for candidates that do not advertise one.
const DEFAULT_PRICE_LEVEL: u8 = 2;

/// Default number of ranked candidates kept per group per window.
pub const DEFAULT_TOP_K: usize = 10;

/// Score, rank, and truncate.
///
/// Pure function over its inputs. Candidates are scored in parallel but
/// collected in input order, then sorted descending with a stable sort so
/// that ties keep their original relative order. An empty candidate list
/// gives an empty ranking, not an error.
pub fn rank(
    aggregate: &AggregatedPreference,
    candidates: Vec<CandidateRestaurant>,
    top_k: usize,
) -> Vec<ScoredCandidate> {
    let total = candidates.len();

    let mut scored: Vec<ScoredCandidate> = candidates
        .into_par_iter()
        .map(|candidate| {
            let score = score_candidate(aggregate, &candidate);
            ScoredCandidate { candidate, score }
        })
        .collect();

    // stable: equal scores stay in candidate order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_k);

    debug!("Ranked {} candidates, kept {}", total, scored.len());
    scored
}

/// Score one candidate against one aggregate.
pub fn score_candidate(aggregate: &AggregatedPreference, candidate: &CandidateRestaurant) -> i32 {
    let cuisine_overlap = aggregate
        .top_cuisines
        .iter()
        .filter(|cuisine| candidate.categories.iter().any(|cat| cat == *cuisine))
        .count() as i32;

    let price_level = candidate.price_level.unwrap_or(DEFAULT_PRICE_LEVEL);
    let budget_match = i32::from(price_level == aggregate.budget_level);

    let dietary_mismatch = candidate
        .dietary_flags
        .symmetric_difference(&aggregate.dietary_restrictions)
        .count() as i32;

    cuisine_overlap * 2 + budget_match - dietary_mismatch
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn aggregate(cuisines: &[&str], dietary: &[&str], budget_level: u8) -> AggregatedPreference {
        AggregatedPreference {
            top_cuisines: cuisines.iter().map(|c| c.to_string()).collect(),
            dietary_restrictions: dietary.iter().map(|d| d.to_string()).collect(),
            budget_level,
        }
    }

    fn candidate(id: &str, categories: &[&str], price: Option<u8>, flags: &[&str]) -> CandidateRestaurant {
        CandidateRestaurant {
            id: id.to_string(),
            name: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            price_level: price,
            dietary_flags: flags.iter().map(|f| f.to_string()).collect(),
            rating: None,
            address: None,
        }
    }

    #[test]
    fn test_score_matches_on_all_three_terms() {
        // cuisine match (+2), budget match (+1), no dietary mismatch
        let agg = aggregate(&["mexican", "thai"], &["vegan"], 2);
        let cand = candidate("r1", &["mexican"], Some(2), &["vegan"]);
        assert_eq!(score_candidate(&agg, &cand), 3);
    }

    #[test]
    fn test_cuisine_overlap_counts_double() {
        let agg = aggregate(&["mexican", "thai", "korean"], &[], 1);
        let none = candidate("r0", &["diners"], Some(1), &[]);
        let one = candidate("r1", &["mexican"], Some(1), &[]);
        let two = candidate("r2", &["mexican", "thai"], Some(1), &[]);

        assert_eq!(score_candidate(&agg, &none), 1);
        assert_eq!(score_candidate(&agg, &one), 3);
        assert_eq!(score_candidate(&agg, &two), 5);
    }

    #[test]
    fn test_adding_an_overlap_never_lowers_the_score() {
        let agg = aggregate(&["mexican", "thai"], &["vegan"], 2);
        let plain = candidate("r1", &["diners"], Some(3), &[]);
        let overlapping = candidate("r1", &["diners", "thai"], Some(3), &[]);

        assert!(score_candidate(&agg, &overlapping) >= score_candidate(&agg, &plain) + 2);
    }

    #[test]
    fn test_duplicate_categories_count_once() {
        let agg = aggregate(&["mexican"], &[], 1);
        let cand = candidate("r1", &["mexican", "mexican"], Some(1), &[]);
        assert_eq!(score_candidate(&agg, &cand), 3);
    }

    #[test]
    fn test_missing_price_level_defaults_to_two() {
        let agg = aggregate(&[], &[], 2);
        let cand = candidate("r1", &[], None, &[]);
        assert_eq!(score_candidate(&agg, &cand), 1);
    }

    #[test]
    fn test_symmetric_difference_penalizes_both_directions() {
        let agg = aggregate(&[], &["vegan", "halal"], 1);

        // missing required support: two misses
        let missing = candidate("r1", &[], Some(3), &[]);
        assert_eq!(score_candidate(&agg, &missing), -2);

        // irrelevant unclaimed flag on top of one match: one miss each way
        let extra = candidate("r2", &[], Some(3), &["vegan", "kosher"]);
        assert_eq!(score_candidate(&agg, &extra), -2);

        // exact flag set: no penalty
        let exact = candidate("r3", &[], Some(3), &["vegan", "halal"]);
        assert_eq!(score_candidate(&agg, &exact), 0);
    }

    #[test]
    fn test_scores_may_go_negative() {
        let agg = aggregate(&[], &["vegan", "halal", "kosher"], 1);
        let cand = candidate("r1", &[], Some(3), &[]);
        assert!(score_candidate(&agg, &cand) < 0);
    }

    #[test]
    fn test_rank_sorts_descending() {
        let agg = aggregate(&["mexican", "thai"], &[], 2);
        let ranked = rank(
            &agg,
            vec![
                candidate("low", &[], Some(3), &[]),
                candidate("high", &["mexican", "thai"], Some(2), &[]),
                candidate("mid", &["mexican"], Some(3), &[]),
            ],
            10,
        );

        let order: Vec<&str> = ranked.iter().map(|s| s.candidate.id.as_str()).collect();
        assert_eq!(order, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let agg = aggregate(&["mexican"], &[], 2);
        let ranked = rank(
            &agg,
            vec![
                candidate("first", &["mexican"], Some(2), &[]),
                candidate("second", &["mexican"], Some(2), &[]),
                candidate("third", &["mexican"], Some(2), &[]),
            ],
            10,
        );

        assert!(ranked.iter().all(|s| s.score == 3));
        let order: Vec<&str> = ranked.iter().map(|s| s.candidate.id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_truncates_to_top_k() {
        let agg = aggregate(&[], &[], 2);
        let candidates: Vec<CandidateRestaurant> = (0..25)
            .map(|i| candidate(&format!("r{}", i), &[], Some(2), &[]))
            .collect();

        assert_eq!(rank(&agg, candidates.clone(), 10).len(), 10);
        assert_eq!(rank(&agg, candidates.clone(), 100).len(), 25);
        assert_eq!(rank(&agg, candidates, 0).len(), 0);
    }

    #[test]
    fn test_rank_empty_candidates_is_empty() {
        let agg = aggregate(&["mexican"], &["vegan"], 1);
        assert!(rank(&agg, Vec::new(), 10).is_empty());
    }

    #[test]
    fn test_rank_keeps_candidate_fields_intact() {
        let agg = aggregate(&["thai"], &[], 2);
        let mut cand = candidate("r1", &["thai"], Some(2), &[]);
        cand.name = Some("Thai Palace".to_string());
        cand.dietary_flags = BTreeSet::new();

        let ranked = rank(&agg, vec![cand], 10);
        assert_eq!(ranked[0].candidate.name.as_deref(), Some("Thai Palace"));
        assert_eq!(ranked[0].score, 3);
    }
}
