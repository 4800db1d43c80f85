// src/pipeline.rs
//! One collection cycle: availability checks, trending scores, live
//! snapshot and daily aggregate, all written under the data directory.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::export::{
    aggregate_daily, save_raw_twitch_snapshot, save_scores, save_top10, save_top_as_csv_json,
    DataLayout,
};
use crate::ingest::collector::Collector;
use crate::ingest::csv_source::collect_from_csv;
use crate::ingest::http::HttpClient;
use crate::ingest::providers::epic_store::EpicStoreClient;
use crate::ingest::providers::liquipedia::LiquipediaClient;
use crate::ingest::providers::twitch::TwitchClient;
use crate::ingest::types::{CategorySource, HealthProbe, PingStatus};
use crate::ingest::{ensure_metrics_described, only_games, sort_and_top};
use crate::scoring::{score_games, ScoringConfig};

/// How many entries of the fresh ranking are logged.
const LOG_TOP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RunMode {
    /// Trending scores, live snapshot and daily aggregate.
    #[default]
    All,
    /// Live snapshot only (intraday polling).
    Live,
    /// Trending scores and daily aggregate only.
    Daily,
}

impl RunMode {
    fn trending(self) -> bool {
        matches!(self, RunMode::All | RunMode::Daily)
    }

    fn live(self) -> bool {
        matches!(self, RunMode::All | RunMode::Live)
    }
}

pub struct PipelineContext {
    pub layout: DataLayout,
    pub collector: Collector,
    pub scoring: ScoringConfig,
    pub limit_games: usize,
    pub top_n: usize,
}

impl PipelineContext {
    /// Wire the HTTP adapters described by `cfg`. Twitch is left out when its
    /// credentials are missing.
    pub fn from_config(cfg: &AppConfig, scoring: ScoringConfig) -> Result<Self> {
        let http = HttpClient::new(&cfg.user_agent, cfg.http_timeout, cfg.retry)?;

        let probes: Vec<Box<dyn HealthProbe>> = vec![
            Box::new(LiquipediaClient::new(cfg.liquipedia_url.clone(), http.clone())),
            Box::new(EpicStoreClient::new(cfg.epic_store_url.clone(), http.clone())),
        ];
        let twitch: Option<Box<dyn CategorySource>> = match &cfg.twitch {
            Some(creds) => Some(Box::new(TwitchClient::new(
                creds.client_id.clone(),
                creds.client_secret.clone(),
                http,
            ))),
            None => {
                tracing::warn!("TWITCH_CLIENT_ID/TWITCH_CLIENT_SECRET not set; Twitch disabled");
                None
            }
        };

        Ok(Self {
            layout: DataLayout::new(cfg.data_dir.clone()),
            collector: Collector::new(probes, twitch),
            scoring,
            limit_games: cfg.limit_games,
            top_n: cfg.top_n,
        })
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub probes: Vec<(&'static str, PingStatus)>,
    pub scored_games: usize,
    pub live_rows: usize,
    pub daily_categories: usize,
    pub written: Vec<PathBuf>,
}

/// Run one cycle for `mode`. `now` stamps the raw snapshot and picks the
/// dated/daily files.
pub async fn run(mode: RunMode, ctx: &PipelineContext, now: DateTime<Utc>) -> Result<RunSummary> {
    ensure_metrics_described();
    let layout = &ctx.layout;
    let today = now.date_naive();
    let mut summary = RunSummary::default();

    tracing::info!(?mode, data_dir = %layout.root().display(), "pipeline run started");

    summary.probes = ctx.collector.quick_check().await;
    for (name, status) in &summary.probes {
        tracing::info!(provider = *name, ok = status.is_ok(), %status, "quick check");
    }

    if mode.trending() {
        let trending = ctx
            .collector
            .trending_from_twitch(layout, ctx.limit_games, ctx.top_n)
            .await?;
        if trending.is_empty() {
            tracing::info!("no trending data; skipping scoring");
        } else {
            let source = layout.twitch_top_csv();
            summary.written.push(layout.twitch_top_json());
            summary.written.push(source.clone());

            let games = collect_from_csv(&source)?;
            let scored = score_games(&games, &ctx.scoring);
            counter!("scoring_games_total").increment(scored.len() as u64);
            summary.scored_games = scored.len();

            summary.written.push(save_scores(layout, &scored)?);
            summary
                .written
                .extend(save_top10(layout, &scored, ctx.top_n, today)?);

            for (i, g) in scored.iter().take(LOG_TOP).enumerate() {
                tracing::info!(
                    rank = i + 1,
                    title = %g.title,
                    score = g.popularity_score,
                    "top game"
                );
            }
        }
    }

    if mode.live() {
        let rows = ctx.collector.twitch_live_rows(ctx.limit_games).await;
        summary.live_rows = rows.len();
        if rows.is_empty() {
            tracing::info!("no live rows; skipping snapshot");
        } else {
            summary
                .written
                .push(save_raw_twitch_snapshot(layout, &rows, now)?);

            let all = layout.top_base("top10_live_all_latest");
            save_top_as_csv_json(&sort_and_top(&rows, ctx.top_n), &all)
                .context("writing live top (all categories)")?;
            let games = layout.top_base("top10_live_games_latest");
            save_top_as_csv_json(&sort_and_top(&only_games(&rows), ctx.top_n), &games)
                .context("writing live top (games only)")?;
            summary.written.extend(csv_json_pair(&all));
            summary.written.extend(csv_json_pair(&games));
        }
    }

    if mode.trending() {
        let (all, games) = aggregate_daily(layout, today, ctx.top_n);
        summary.daily_categories = all.len();
        if all.is_empty() {
            tracing::info!(date = %today, "no snapshots for today; skipping daily aggregate");
        } else {
            for (stem, rows) in [("top10_daily_all", &all), ("top10_daily_games", &games)] {
                for base in [
                    layout.top_base(&format!("{stem}_{today}")),
                    layout.top_base(&format!("{stem}_latest")),
                ] {
                    save_top_as_csv_json(rows, &base)
                        .with_context(|| format!("writing {}", base.display()))?;
                    summary.written.extend(csv_json_pair(&base));
                }
            }
            tracing::info!(date = %today, categories = all.len(), "daily aggregate saved");
        }
    }

    gauge!("pipeline_last_run_ts").set(now.timestamp() as f64);
    tracing::info!(
        scored = summary.scored_games,
        live_rows = summary.live_rows,
        files = summary.written.len(),
        "pipeline run finished"
    );
    Ok(summary)
}

fn csv_json_pair(base: &std::path::Path) -> [PathBuf; 2] {
    [
        crate::export::with_ext(base, "csv"),
        crate::export::with_ext(base, "json"),
    ]
}
