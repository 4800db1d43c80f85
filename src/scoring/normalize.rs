//! Normalization of heterogeneous metrics onto a dimensionless [0,1] scale.
//!
//! Two regimes:
//! - fixed-scale metrics (0..100) are divided by 100 and clamped;
//! - open-scale metrics are min-max scaled against the range observed in the
//!   current batch.
//!
//! Open-scale normalization is **batch-relative**: the same raw value can
//! normalize differently in two batches, because the reference range is the
//! batch itself. Scores from different batches are therefore not comparable.
//!
//! A missing value always normalizes to 0 ("no signal"); nothing is imputed.

use crate::models::{GameSnapshot, Metric, Scale};
use std::collections::BTreeMap;

/// Observed (min, max) of one metric across the records where it is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    fn widen(range: Option<Self>, v: f64) -> Self {
        match range {
            Some(r) => Self {
                min: r.min.min(v),
                max: r.max.max(v),
            },
            None => Self { min: v, max: v },
        }
    }

    /// max ≤ min: every open-scale value in the batch normalizes to 0.
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }
}

/// Ranges per requested metric. `None` means no record carries the metric.
pub fn metric_ranges(
    games: &[GameSnapshot],
    keys: impl IntoIterator<Item = Metric>,
) -> BTreeMap<Metric, Option<MetricRange>> {
    let mut ranges: BTreeMap<Metric, Option<MetricRange>> =
        keys.into_iter().map(|k| (k, None)).collect();
    for g in games {
        for (metric, range) in ranges.iter_mut() {
            if let Some(v) = g.metric(*metric) {
                *range = Some(MetricRange::widen(*range, v));
            }
        }
    }
    ranges
}

/// Normalize one raw value.
pub fn normalize(value: Option<f64>, range: Option<MetricRange>, scale: Scale) -> f64 {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return 0.0;
    };
    match scale {
        Scale::Fixed100 => (v / 100.0).clamp(0.0, 1.0),
        Scale::Open => match range {
            Some(r) if !r.is_degenerate() => ((v - r.min) / (r.max - r.min)).clamp(0.0, 1.0),
            _ => 0.0,
        },
    }
}
