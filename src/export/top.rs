//! Ranked exports: the scored Top-N and the live/daily viewer tops.
//!
//! CSV columns are always `rank,title,popularity_score,twitch_viewers`
//! (Twitch viewers is the headline metric). JSON payloads carry the same
//! fields plus a `metrics` object; the scored Top-N also carries tags and the
//! full normalized component breakdown.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{with_ext, write_csv_atomic, write_json_atomic, DataLayout};
use crate::ingest::types::LiveRow;
use crate::models::{Genre, Mechanic, Metric, ScoredGame};

pub const TOP_CSV_HEADER: [&str; 4] = ["rank", "title", "popularity_score", "twitch_viewers"];

#[derive(Debug, Serialize)]
struct TopCsvRow<'a> {
    rank: usize,
    title: &'a str,
    popularity_score: f64,
    twitch_viewers: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct HeadlineMetrics {
    twitch_viewers: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ScoredEntry<'a> {
    rank: usize,
    title: &'a str,
    popularity_score: f64,
    metrics: HeadlineMetrics,
    genres: &'a [Genre],
    mechanics: &'a [Mechanic],
    components: &'a BTreeMap<Metric, f64>,
}

#[derive(Debug, Serialize)]
struct ViewerEntry<'a> {
    rank: usize,
    title: &'a str,
    popularity_score: f64,
    metrics: HeadlineMetrics,
}

/// Top-N by popularity index: dated CSV, latest CSV, latest JSON.
/// Returns the written paths.
pub fn save_top10(
    layout: &DataLayout,
    scored: &[ScoredGame],
    n: usize,
    date: NaiveDate,
) -> Result<Vec<PathBuf>> {
    let top = &scored[..n.min(scored.len())];

    let csv_rows = || {
        top.iter().enumerate().map(|(i, g)| TopCsvRow {
            rank: i + 1,
            title: &g.title,
            popularity_score: g.popularity_score,
            twitch_viewers: g.metrics.twitch_viewers,
        })
    };
    let dated = layout.top10_dated_csv(date);
    let latest_csv = layout.top10_latest_csv();
    let latest_json = layout.top10_latest_json();
    write_csv_atomic(&dated, &TOP_CSV_HEADER, csv_rows())?;
    write_csv_atomic(&latest_csv, &TOP_CSV_HEADER, csv_rows())?;

    let payload: Vec<ScoredEntry<'_>> = top
        .iter()
        .enumerate()
        .map(|(i, g)| ScoredEntry {
            rank: i + 1,
            title: &g.title,
            popularity_score: g.popularity_score,
            metrics: HeadlineMetrics {
                twitch_viewers: g.metrics.twitch_viewers,
            },
            genres: &g.genres,
            mechanics: &g.mechanics,
            components: &g.components,
        })
        .collect();
    write_json_atomic(&latest_json, &payload)?;

    tracing::info!(
        csv = %latest_csv.display(),
        json = %latest_json.display(),
        rows = top.len(),
        "saved top-N index files"
    );
    Ok(vec![dated, latest_csv, latest_json])
}

/// Full scored list (every field) for analysis and reports.
pub fn save_scores(layout: &DataLayout, scored: &[ScoredGame]) -> Result<PathBuf> {
    let path = layout.scores_latest();
    write_json_atomic(&path, scored)?;
    tracing::info!(path = %path.display(), games = scored.len(), "saved detailed scores");
    Ok(path)
}

/// Live/daily viewer top as `<base>.csv` + `<base>.json`. These rows are not
/// scored, so `popularity_score` is 0.0.
pub fn save_top_as_csv_json(rows: &[LiveRow], base: &Path) -> Result<()> {
    write_csv_atomic(
        &with_ext(base, "csv"),
        &TOP_CSV_HEADER,
        rows.iter().enumerate().map(|(i, r)| TopCsvRow {
            rank: i + 1,
            title: &r.name,
            popularity_score: 0.0,
            twitch_viewers: Some(r.twitch_viewers),
        }),
    )?;

    let payload: Vec<ViewerEntry<'_>> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| ViewerEntry {
            rank: i + 1,
            title: &r.name,
            popularity_score: 0.0,
            metrics: HeadlineMetrics {
                twitch_viewers: Some(r.twitch_viewers),
            },
        })
        .collect();
    write_json_atomic(&with_ext(base, "json"), &payload)
}
