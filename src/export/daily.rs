//! Daily aggregate: per-category median of the intraday raw snapshots.
//!
//! The median is robust to short audience spikes/drops between polls. One
//! value per category per calendar day (UTC); categories without any usable
//! observation that day are absent from the result.

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::DataLayout;
use crate::ingest::types::LiveRow;
use crate::ingest::{only_games, sort_and_top};

/// Median of a non-empty sample. Even counts take the floor of the mean of
/// the two middle values.
fn median(values: &mut [u64]) -> Option<u64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        let (a, b) = (values[mid - 1], values[mid]);
        Some(a / 2 + b / 2 + (a % 2 + b % 2) / 2)
    }
}

/// Per-category median across snapshots. Keeps first-seen category order;
/// the name is the one seen last.
pub fn median_by_category<I>(snapshots: I) -> Vec<LiveRow>
where
    I: IntoIterator<Item = Vec<LiveRow>>,
{
    let mut order: Vec<String> = Vec::new();
    let mut acc: HashMap<String, (String, Vec<u64>)> = HashMap::new();

    for snapshot in snapshots {
        for row in snapshot {
            if row.id.is_empty() {
                continue;
            }
            let entry = acc.entry(row.id.clone()).or_insert_with(|| {
                order.push(row.id.clone());
                (String::new(), Vec::new())
            });
            entry.0 = row.name;
            entry.1.push(row.twitch_viewers);
        }
    }

    order
        .into_iter()
        .filter_map(|id| {
            let (name, mut values) = acc.remove(&id)?;
            let twitch_viewers = median(&mut values)?;
            Some(LiveRow {
                id,
                name,
                twitch_viewers,
            })
        })
        .collect()
}

/// Raw row → `LiveRow`. Ids may be strings or numbers; rows without an id or
/// a viewer count are skipped.
fn row_from_value(v: &Value) -> Option<LiveRow> {
    let id = match v.get("id")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if id.is_empty() {
        return None;
    }
    let twitch_viewers = match v.get("twitch_viewers")? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        })?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    let name = v
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(LiveRow {
        id,
        name,
        twitch_viewers,
    })
}

/// Snapshot files of one day, in file-name (= capture time) order.
fn snapshot_files(day_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(day_dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            name.starts_with("snapshot_") && name.ends_with(".json")
        })
        .collect();
    files.sort();
    files
}

/// Load every readable snapshot of `date`. Unreadable or malformed files are
/// skipped with a warning.
pub fn load_day_snapshots(layout: &DataLayout, date: NaiveDate) -> Vec<Vec<LiveRow>> {
    snapshot_files(&layout.raw_day_dir(date))
        .into_iter()
        .filter_map(|path| {
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|s| serde_json::from_str::<Vec<Value>>(&s).map_err(|e| e.to_string()));
            match parsed {
                Ok(values) => Some(values.iter().filter_map(row_from_value).collect()),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unreadable snapshot");
                    None
                }
            }
        })
        .collect()
}

/// Daily medians ranked by viewers: `(all categories, games only)`, each
/// truncated to `top_n`. Both are empty when the day has no snapshots.
pub fn aggregate_daily(
    layout: &DataLayout,
    date: NaiveDate,
    top_n: usize,
) -> (Vec<LiveRow>, Vec<LiveRow>) {
    let snapshots = load_day_snapshots(layout, date);
    if snapshots.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let aggregated = median_by_category(snapshots);
    let all = sort_and_top(&aggregated, top_n);
    let games = sort_and_top(&only_games(&aggregated), top_n);
    tracing::debug!(
        %date,
        categories = aggregated.len(),
        "daily medians computed"
    );
    (all, games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, name: &str, v: u64) -> LiveRow {
        LiveRow {
            id: id.into(),
            name: name.into(),
            twitch_viewers: v,
        }
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&mut [100, 300, 200]), Some(200));
        assert_eq!(median(&mut [1, 4]), Some(2));
        assert_eq!(median(&mut [5]), Some(5));
        assert_eq!(median(&mut []), None);
        assert_eq!(median(&mut [u64::MAX, u64::MAX]), Some(u64::MAX));
    }

    #[test]
    fn median_ignores_arrival_order() {
        let perms = [[100, 300, 200], [300, 200, 100], [200, 100, 300]];
        for p in perms {
            let snaps = p.iter().map(|v| vec![row("X", "X", *v)]).collect::<Vec<_>>();
            let out = median_by_category(snaps);
            assert_eq!(out, vec![row("X", "X", 200)]);
        }
    }

    #[test]
    fn last_name_wins_and_order_is_first_seen() {
        let out = median_by_category(vec![
            vec![row("2", "Old name", 10), row("1", "A", 5)],
            vec![row("2", "New name", 30)],
        ]);
        assert_eq!(out, vec![row("2", "New name", 20), row("1", "A", 5)]);
    }

    #[test]
    fn raw_rows_are_read_leniently() {
        assert_eq!(
            row_from_value(&json!({"id": 509658, "name": "Just Chatting", "twitch_viewers": 10})),
            Some(row("509658", "Just Chatting", 10))
        );
        assert_eq!(row_from_value(&json!({"id": "", "twitch_viewers": 10})), None);
        assert_eq!(row_from_value(&json!({"id": "1", "twitch_viewers": null})), None);
        assert_eq!(row_from_value(&json!({"id": "1"})), None);
        assert_eq!(
            row_from_value(&json!({"id": "1", "twitch_viewers": "42"})),
            Some(row("1", "", 42))
        );
    }
}
