// src/scoring/mod.rs
//! Popularity scoring engine.
//!
//! popularity_score = Σ weight[k] * normalized[k], rounded to 6 decimals, over
//! the metrics present in the weights. The per-metric normalized values are
//! kept on each result as `components` for explainability.
//!
//! Pure functions only: no I/O, no errors, no panics for any input shape.

pub mod normalize;
pub mod slicing;
pub mod weights;

use crate::models::{GameSnapshot, ScoredGame};
use std::collections::BTreeMap;

pub use normalize::{metric_ranges, normalize, MetricRange};
pub use slicing::{top_by_genre, top_by_mechanic};
pub use weights::{ScoringWeights, WeightsError};

/// Decimal places kept in `popularity_score` (stable serialization).
pub const SCORE_PRECISION: i32 = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
}

impl ScoringConfig {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

/// Score a batch and return it sorted by `popularity_score` descending.
/// Ties keep their input order.
///
/// Open-scale metrics are normalized against this batch only (see
/// [`normalize`]), so the same game can score differently in another batch.
pub fn score_games(games: &[GameSnapshot], config: &ScoringConfig) -> Vec<ScoredGame> {
    let weights = &config.weights;
    let ranges = metric_ranges(games, weights.keys());

    let mut scored: Vec<ScoredGame> = games
        .iter()
        .map(|g| {
            let components: BTreeMap<_, _> = weights
                .keys()
                .map(|k| {
                    let range = ranges.get(&k).copied().flatten();
                    (k, normalize(g.metric(k), range, k.scale()))
                })
                .collect();
            let raw: f64 = weights.iter().map(|(k, w)| w * components[&k]).sum();

            ScoredGame {
                title: g.title.clone(),
                genres: g.genres.clone(),
                mechanics: g.mechanics.clone(),
                metrics: g.clone(),
                popularity_score: round_score(raw),
                components,
            }
        })
        .collect();

    // `sort_by` is stable.
    scored.sort_by(|a, b| b.popularity_score.total_cmp(&a.popularity_score));
    scored
}

fn round_score(x: f64) -> f64 {
    let factor = 10f64.powi(SCORE_PRECISION);
    (x * factor).round() / factor
}
