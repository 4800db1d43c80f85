// src/ingest/mod.rs
pub mod collector;
pub mod csv_source;
pub mod http;
pub mod providers;
pub mod types;

use crate::ingest::types::LiveRow;
use metrics::{describe_counter, describe_gauge};
use once_cell::sync::OnceCell;

/// Twitch categories that are not games; excluded from "games only" tops.
pub const NON_GAME_CATEGORY_IDS: [&str; 4] = [
    "509658", // Just Chatting
    "509660", // Music
    "509659", // Special Events
    "511224", // Travel & Outdoors
];

/// One-time metrics registration (so series carry descriptions when exported).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider ping/fetch errors."
        );
        describe_counter!(
            "ingest_live_rows_total",
            "Live category rows collected from Twitch."
        );
        describe_counter!("http_retries_total", "HTTP requests retried.");
        describe_counter!("scoring_games_total", "Games scored.");
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the collection pipeline last ran."
        );
    });
}

pub fn is_game_category(id: &str) -> bool {
    !NON_GAME_CATEGORY_IDS.contains(&id)
}

/// Drop non-game categories (Just Chatting, Music, ...).
pub fn only_games(rows: &[LiveRow]) -> Vec<LiveRow> {
    rows.iter().filter(|r| is_game_category(&r.id)).cloned().collect()
}

/// Sort by viewers descending (stable) and keep the first `n`.
pub fn sort_and_top(rows: &[LiveRow], n: usize) -> Vec<LiveRow> {
    let mut out = rows.to_vec();
    out.sort_by(|a, b| b.twitch_viewers.cmp(&a.twitch_viewers));
    out.truncate(n);
    out
}
