// src/export/mod.rs
//! On-disk layout and atomic writers for every CSV/JSON artifact.
//!
//! Each file is written to a sibling temp file and renamed over the target,
//! so readers see either the previous or the new content, never a partial one.

pub mod daily;
pub mod raw;
pub mod top;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub use daily::{aggregate_daily, median_by_category};
pub use raw::save_raw_twitch_snapshot;
pub use top::{save_scores, save_top10, save_top_as_csv_json};

pub const DEFAULT_DATA_DIR: &str = "data";

/// Canonical paths under the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current Twitch top written by the collector (`name,twitch_viewers`).
    pub fn twitch_top_csv(&self) -> PathBuf {
        self.root.join("top10_twitch.csv")
    }

    pub fn twitch_top_json(&self) -> PathBuf {
        self.root.join("top10_twitch.json")
    }

    pub fn scores_latest(&self) -> PathBuf {
        self.root.join("scores").join("latest.json")
    }

    pub fn top10_dir(&self) -> PathBuf {
        self.root.join("top10")
    }

    pub fn top10_dated_csv(&self, date: NaiveDate) -> PathBuf {
        self.top10_dir().join(format!("top10_{}.csv", date.format("%Y-%m-%d")))
    }

    pub fn top10_latest_csv(&self) -> PathBuf {
        self.top10_dir().join("top10_latest.csv")
    }

    pub fn top10_latest_json(&self) -> PathBuf {
        self.top10_dir().join("top10_latest.json")
    }

    /// Extension-less base for a `.csv` + `.json` pair in `top10/`.
    pub fn top_base(&self, stem: &str) -> PathBuf {
        self.top10_dir().join(stem)
    }

    pub fn raw_twitch_dir(&self) -> PathBuf {
        self.root.join("raw").join("twitch")
    }

    pub fn raw_day_dir(&self, date: NaiveDate) -> PathBuf {
        self.raw_twitch_dir().join(date.format("%Y-%m-%d").to_string())
    }

    pub fn raw_snapshot(&self, at: DateTime<Utc>) -> PathBuf {
        self.raw_day_dir(at.date_naive())
            .join(format!("snapshot_{}.json", at.format("%H%M%S")))
    }
}

/// `base` with `.ext` appended (keeps dots already in the stem).
pub fn with_ext(base: &Path, ext: &str) -> PathBuf {
    let mut s = base.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Write `bytes` to `path` via temp file + rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("no file name in {}", path.display()))?;
    let tmp = path.with_file_name(format!(".{file_name}.tmp-{}", std::process::id()));

    fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("replacing {}", path.display()));
    }
    Ok(())
}

/// Pretty JSON (2-space indent, UTF-8 as is).
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)
        .with_context(|| format!("serializing JSON for {}", path.display()))?;
    write_atomic(path, &body)
}

/// CSV with an explicit header row (written even when `rows` is empty).
pub fn write_csv_atomic<S, I>(path: &Path, header: &[&str], rows: I) -> Result<()>
where
    S: Serialize,
    I: IntoIterator<Item = S>,
{
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    w.write_record(header)?;
    for row in rows {
        w.serialize(row)
            .with_context(|| format!("serializing CSV row for {}", path.display()))?;
    }
    let body = w
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {}", e.error()))?;
    write_atomic(path, &body)
}
