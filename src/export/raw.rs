use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::{write_json_atomic, DataLayout};
use crate::ingest::types::LiveRow;

/// Store the live category state under `raw/twitch/<date>/snapshot_<HHMMSS>.json`.
/// Raw files are only ever added; the daily aggregate reads them back.
pub fn save_raw_twitch_snapshot(
    layout: &DataLayout,
    rows: &[LiveRow],
    at: DateTime<Utc>,
) -> Result<PathBuf> {
    let path = layout.raw_snapshot(at);
    write_json_atomic(&path, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "saved raw twitch snapshot");
    Ok(path)
}
