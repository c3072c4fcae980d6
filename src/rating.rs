//! Elo-style per-tag skill rating and candidate ranking

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Rating every tag starts from
pub const INITIAL_RATING: f64 = 1400.0;
/// Step size of each update
pub const K_FACTOR: f64 = 30.0;

#[derive(Debug, Error, PartialEq)]
pub enum RatingError {
    #[error("no weight given for tag '{0}'")]
    MissingWeight(String),

    #[error("total weight is zero")]
    ZeroWeight,
}

pub type Result<T> = std::result::Result<T, RatingError>;

/// One attempted problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub tags: Vec<String>,
    pub difficulty_rating: f64,
    pub is_solved: bool,
}

/// A candidate and the problems they attempted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub handle: String,
    #[serde(default)]
    pub problems: Vec<Problem>,
}

/// Logistic Elo curve `1 / (1 + 10^((a - b) / 400))` used as the expected score
pub fn win_probability(a: f64, b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((a - b) / 400.0))
}

/// Fold the problem list into one rating per tag
pub fn elo_ratings(problems: &[Problem]) -> BTreeMap<String, f64> {
    let mut ratings = BTreeMap::new();

    for problem in problems {
        let score = if problem.is_solved { 1.0 } else { 0.0 };
        for tag in &problem.tags {
            let rating = ratings.entry(tag.clone()).or_insert(INITIAL_RATING);
            let expected = win_probability(*rating, problem.difficulty_rating);
            *rating += K_FACTOR * (score - expected);
        }
    }

    ratings
}

/// Weighted average of the per-tag ratings
pub fn combine_ratings(
    ratings: &BTreeMap<String, f64>,
    weights: &BTreeMap<String, f64>,
) -> Result<f64> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for (tag, rating) in ratings {
        let weight = weights
            .get(tag)
            .ok_or_else(|| RatingError::MissingWeight(tag.clone()))?;
        weighted_sum += weight * rating;
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return Err(RatingError::ZeroWeight);
    }

    Ok(weighted_sum / total_weight)
}

/// Rank candidates by combined rating, best first
///
/// Only the tags named in `weights` are considered for each candidate.
/// Candidates with none of those tags have no rating and are left out.
pub fn rank_candidates(
    candidates: &[Candidate],
    weights: &BTreeMap<String, f64>,
) -> Result<Vec<(String, f64)>> {
    let mut ranked = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let relevant: BTreeMap<String, f64> = elo_ratings(&candidate.problems)
            .into_iter()
            .filter(|(tag, _)| weights.contains_key(tag))
            .collect();
        match combine_ratings(&relevant, weights) {
            Ok(combined) => ranked.push((candidate.handle.clone(), combined)),
            Err(RatingError::ZeroWeight) => {
                debug!(handle = %candidate.handle, "No weighted tags, skipping candidate");
            }
            Err(e) => return Err(e),
        }
    }

    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(tags: &[&str], difficulty: f64, solved: bool) -> Problem {
        Problem {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            difficulty_rating: difficulty,
            is_solved: solved,
        }
    }

    fn weights(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(t, w)| (t.to_string(), *w)).collect()
    }

    #[test]
    fn test_equal_ratings_are_even() {
        assert!((win_probability(1500.0, 1500.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_update() {
        let ratings = elo_ratings(&[problem(&["dp"], 1400.0, true)]);
        assert!((ratings["dp"] - 1415.0).abs() < 1e-9);

        let ratings = elo_ratings(&[problem(&["dp"], 1400.0, false)]);
        assert!((ratings["dp"] - 1385.0).abs() < 1e-9);
    }

    #[test]
    fn test_tags_are_independent() {
        let ratings = elo_ratings(&[
            problem(&["dp", "math"], 1400.0, true),
            problem(&["math"], 1400.0, false),
        ]);
        assert!((ratings["dp"] - 1415.0).abs() < 1e-9);
        assert!(ratings["math"] < 1415.0);
    }

    #[test]
    fn test_combine_ratings() {
        let ratings = weights(&[("dp", 1600.0), ("math", 1200.0)]);
        let combined = combine_ratings(&ratings, &weights(&[("dp", 3.0), ("math", 1.0)])).unwrap();
        assert!((combined - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_errors() {
        let ratings = weights(&[("dp", 1600.0)]);
        assert_eq!(
            combine_ratings(&ratings, &BTreeMap::new()),
            Err(RatingError::MissingWeight("dp".to_string()))
        );
        assert_eq!(
            combine_ratings(&BTreeMap::new(), &weights(&[("dp", 1.0)])),
            Err(RatingError::ZeroWeight)
        );
    }

    #[test]
    fn test_rank_candidates() {
        let candidates = vec![
            Candidate {
                handle: "weak".to_string(),
                problems: vec![problem(&["dp"], 1400.0, false)],
            },
            Candidate {
                handle: "strong".to_string(),
                problems: vec![
                    problem(&["dp"], 1800.0, true),
                    problem(&["graphs"], 1800.0, true),
                ],
            },
        ];

        let ranked = rank_candidates(&candidates, &weights(&[("dp", 1.0)])).unwrap();
        assert_eq!(ranked[0].0, "strong");
        assert_eq!(ranked[1].0, "weak");
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn test_rank_skips_candidates_without_weighted_tags() {
        let candidates = vec![
            Candidate {
                handle: "graphs-only".to_string(),
                problems: vec![problem(&["graphs"], 1800.0, true)],
            },
            Candidate {
                handle: "idle".to_string(),
                problems: Vec::new(),
            },
            Candidate {
                handle: "dp".to_string(),
                problems: vec![problem(&["dp"], 1400.0, true)],
            },
        ];

        let ranked = rank_candidates(&candidates, &weights(&[("dp", 1.0)])).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, "dp");
        assert!((ranked[0].1 - 1415.0).abs() < 1e-9);
    }
}
