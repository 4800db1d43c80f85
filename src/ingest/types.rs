// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Outcome of a health probe. Failures are data, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PingStatus {
    Reachable { status: u16, bytes: usize },
    Failed { error: String },
}

impl PingStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, PingStatus::Reachable { status, .. } if (200..300).contains(status))
    }
}

impl std::fmt::Display for PingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PingStatus::Reachable { status, bytes } => write!(f, "status={status} bytes={bytes}"),
            PingStatus::Failed { error } => write!(f, "error={error}"),
        }
    }
}

/// An upstream API that can be checked for availability.
#[async_trait::async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> PingStatus;
    fn name(&self) -> &'static str;
}

/// A streaming category (on Twitch: a game or a non-game section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Source of live category audiences.
#[async_trait::async_trait]
pub trait CategorySource: Send + Sync {
    /// Categories ordered by current audience, at most `first`.
    async fn top_categories(&self, first: usize) -> Result<Vec<Category>>;
    /// Current viewers of one category.
    async fn category_viewers(&self, category_id: &str) -> Result<u64>;
    fn name(&self) -> &'static str;
}

/// One category with its live audience, as stored in raw snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveRow {
    pub id: String,
    pub name: String,
    pub twitch_viewers: u64,
}
