//! Scoring weights: metric → linear multiplier on the normalized [0,1] value.
//!
//! JSON shape (TOML is the same table):
//! {
//!   "twitch_viewers": 0.6,
//!   "critic_score": 0.4
//! }
//!
//! The key set defines which metrics take part in scoring. Weights need not
//! sum to 1; a popularity score only stays within [0,1] when they do not
//! exceed 1 in total. `validate()` is the gate used when weights come from
//! configuration; the scoring engine itself accepts whatever it is given.

use crate::models::Metric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tolerance for the "weights sum above 1" check.
const SUM_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringWeights(BTreeMap<Metric, f64>);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightsError {
    #[error("no metrics configured for scoring")]
    Empty,
    #[error("weight for `{metric}` is negative ({value})")]
    Negative { metric: Metric, value: f64 },
    #[error("weight for `{metric}` is not a finite number")]
    NotFinite { metric: Metric },
}

impl Default for ScoringWeights {
    /// Current activity leads; streaming audience second; reviews, trends and
    /// content reach split most of the rest.
    fn default() -> Self {
        Self::from_pairs([
            (Metric::ActivePlayers, 0.25),
            (Metric::TwitchViewers, 0.20),
            (Metric::YoutubeViewsDaily, 0.10),
            (Metric::RedditMentionsDaily, 0.05),
            (Metric::CriticScore, 0.10),
            (Metric::UserScore, 0.10),
            (Metric::GoogleTrendsScore, 0.10),
            (Metric::EsportsViewers, 0.07),
            (Metric::SalesOrRevenueIndex, 0.03),
        ])
    }
}

impl ScoringWeights {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Metric, f64)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    /// Participating metrics in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = Metric> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().map(|(m, w)| (*m, *w))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Upper bound of any popularity score produced with these weights.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// True when scores are guaranteed to land in [0,1].
    pub fn is_unit_bounded(&self) -> bool {
        self.total() <= 1.0 + SUM_EPSILON
    }

    /// Reject weights that would make scores meaningless. A total above 1 is
    /// allowed (callers may rely on scores above 1.0) and only reported by
    /// `is_unit_bounded`.
    pub fn validate(&self) -> Result<(), WeightsError> {
        if self.0.is_empty() {
            return Err(WeightsError::Empty);
        }
        for (metric, value) in self.iter() {
            if !value.is_finite() {
                return Err(WeightsError::NotFinite { metric });
            }
            if value < 0.0 {
                return Err(WeightsError::Negative { metric, value });
            }
        }
        Ok(())
    }
}
