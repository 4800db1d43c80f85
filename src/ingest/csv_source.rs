// src/ingest/csv_source.rs
//! Build snapshots from a previously saved tabular export.
//!
//! The title comes from a `name` or `title` column (first non-empty wins,
//! "Unknown" otherwise). Any column named after a metric
//! (`twitch_viewers`, `critic_score`, ...) fills that metric; empty or
//! non-numeric cells stay absent. Other columns are ignored.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::models::{GameSnapshot, Metric};

const UNKNOWN_TITLE: &str = "Unknown";

pub fn collect_from_csv(path: &Path) -> Result<Vec<GameSnapshot>> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    collect_from_reader(file).with_context(|| format!("reading {}", path.display()))
}

pub fn collect_from_reader<R: Read>(reader: R) -> Result<Vec<GameSnapshot>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let name_col = column("name");
    let title_col = column("title");
    let metric_cols: Vec<(Metric, usize)> = Metric::ALL
        .into_iter()
        .filter_map(|m| column(m.as_str()).map(|i| (m, i)))
        .collect();

    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record.context("reading CSV record")?;
        let cell = |i: Option<usize>| i.and_then(|i| record.get(i)).filter(|s| !s.is_empty());

        let title = cell(name_col).or(cell(title_col)).unwrap_or(UNKNOWN_TITLE);
        let mut snap = GameSnapshot::new(title);
        for (metric, idx) in &metric_cols {
            let value = cell(Some(*idx)).and_then(|s| s.parse::<f64>().ok());
            snap.set_metric(*metric, value);
        }
        out.push(snap);
    }
    Ok(out)
}
