// src/ingest/collector.rs
use anyhow::Result;
use metrics::counter;
use serde::Serialize;

use crate::export::{write_csv_atomic, write_json_atomic, DataLayout};
use crate::ingest::sort_and_top;
use crate::ingest::types::{CategorySource, HealthProbe, LiveRow, PingStatus};

/// Gathers availability checks and live audience data from the configured
/// adapters. Sources are queried one after another.
pub struct Collector {
    probes: Vec<Box<dyn HealthProbe>>,
    twitch: Option<Box<dyn CategorySource>>,
}

#[derive(Serialize)]
struct TwitchCsvRow<'a> {
    name: &'a str,
    twitch_viewers: u64,
}

impl Collector {
    pub fn new(probes: Vec<Box<dyn HealthProbe>>, twitch: Option<Box<dyn CategorySource>>) -> Self {
        Self { probes, twitch }
    }

    /// Ping every probe. Never fails; problems show up as `PingStatus::Failed`.
    pub async fn quick_check(&self) -> Vec<(&'static str, PingStatus)> {
        let mut report = Vec::with_capacity(self.probes.len());
        for p in &self.probes {
            report.push((p.name(), p.ping().await));
        }
        report
    }

    /// Current categories with their viewers: `[{id, name, twitch_viewers}]`.
    /// Empty when Twitch is not configured or the category list fails; a
    /// category whose viewer count fails is skipped.
    pub async fn twitch_live_rows(&self, limit_games: usize) -> Vec<LiveRow> {
        let Some(src) = self.twitch.as_deref() else {
            return Vec::new();
        };

        let categories = match src.top_categories(limit_games).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = ?e, provider = src.name(), "listing top categories failed");
                counter!("ingest_provider_errors_total", "provider" => src.name()).increment(1);
                return Vec::new();
            }
        };

        let mut rows = Vec::with_capacity(categories.len());
        for c in categories {
            match src.category_viewers(&c.id).await {
                Ok(twitch_viewers) => rows.push(LiveRow {
                    id: c.id,
                    name: c.name,
                    twitch_viewers,
                }),
                Err(e) => {
                    tracing::warn!(error = ?e, category = %c.name, "viewer count failed, skipping");
                    counter!("ingest_provider_errors_total", "provider" => src.name()).increment(1);
                }
            }
        }
        counter!("ingest_live_rows_total").increment(rows.len() as u64);
        rows
    }

    /// Top-N categories right now. Also writes `top10_twitch.json` (full rows)
    /// and `top10_twitch.csv` (`name,twitch_viewers`), which the scoring step
    /// reads back.
    pub async fn trending_from_twitch(
        &self,
        layout: &DataLayout,
        limit_games: usize,
        top_n: usize,
    ) -> Result<Vec<LiveRow>> {
        let rows = self.twitch_live_rows(limit_games).await;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let top = sort_and_top(&rows, top_n);

        write_json_atomic(&layout.twitch_top_json(), &top)?;
        write_csv_atomic(
            &layout.twitch_top_csv(),
            &["name", "twitch_viewers"],
            top.iter().map(|r| TwitchCsvRow {
                name: &r.name,
                twitch_viewers: r.twitch_viewers,
            }),
        )?;
        Ok(top)
    }
}
