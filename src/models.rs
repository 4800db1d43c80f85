//! Game snapshot data model.
//!
//! - `Genre` / `Mechanic`: closed, auditable tag vocabularies.
//! - `Metric`: the fixed set of numeric popularity signals.
//! - `GameSnapshot`: one record per game per collection cycle. Every metric is
//!   optional; absence and zero are different things and stay different.
//! - `ScoredGame`: the scored projection that is written to disk.
//!
//! Deserialization is forgiving towards upstream drift: unknown fields are
//! ignored, unknown tags are dropped, and metric values that do not coerce to
//! a number are read as absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Game genre (closed vocabulary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Shooter,
    Moba,
    BattleRoyale,
    Rpg,
    Mmorpg,
    Action,
    Strategy,
    Sports,
    Racing,
    Sandbox,
    Survival,
    Simulation,
    Horror,
}

impl Genre {
    pub const ALL: [Genre; 13] = [
        Genre::Shooter,
        Genre::Moba,
        Genre::BattleRoyale,
        Genre::Rpg,
        Genre::Mmorpg,
        Genre::Action,
        Genre::Strategy,
        Genre::Sports,
        Genre::Racing,
        Genre::Sandbox,
        Genre::Survival,
        Genre::Simulation,
        Genre::Horror,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Shooter => "shooter",
            Genre::Moba => "moba",
            Genre::BattleRoyale => "battle_royale",
            Genre::Rpg => "rpg",
            Genre::Mmorpg => "mmorpg",
            Genre::Action => "action",
            Genre::Strategy => "strategy",
            Genre::Sports => "sports",
            Genre::Racing => "racing",
            Genre::Sandbox => "sandbox",
            Genre::Survival => "survival",
            Genre::Simulation => "simulation",
            Genre::Horror => "horror",
        }
    }
}

/// Gameplay mechanic (closed vocabulary). Mechanics are not genres, but a few
/// names overlap on purpose so both can be used as filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanic {
    Solo,
    Coop,
    TeamCompetitive,
    OpenWorld,
    Shooter,
    Extraction,
}

impl Mechanic {
    pub const ALL: [Mechanic; 6] = [
        Mechanic::Solo,
        Mechanic::Coop,
        Mechanic::TeamCompetitive,
        Mechanic::OpenWorld,
        Mechanic::Shooter,
        Mechanic::Extraction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mechanic::Solo => "solo",
            Mechanic::Coop => "coop",
            Mechanic::TeamCompetitive => "team_competitive",
            Mechanic::OpenWorld => "open_world",
            Mechanic::Shooter => "shooter",
            Mechanic::Extraction => "extraction",
        }
    }
}

/// Error for a tag or metric name outside the closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownName {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Genre {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == key)
            .ok_or_else(|| UnknownName {
                kind: "genre",
                value: s.to_string(),
            })
    }
}

impl FromStr for Mechanic {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| UnknownName {
                kind: "mechanic",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Mechanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a metric is brought onto the common [0,1] scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Natural range 0..100 (review scores, trend indices): divide by 100.
    Fixed100,
    /// No ceiling (viewers, players): min-max against the current batch.
    Open,
}

/// Popularity signals a snapshot can carry.
///
/// Declaration order is the canonical order of `components` in exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ActivePlayers,
    TwitchViewers,
    YoutubeViewsDaily,
    RedditMentionsDaily,
    CriticScore,
    UserScore,
    GoogleTrendsScore,
    EsportsViewers,
    SalesOrRevenueIndex,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::ActivePlayers,
        Metric::TwitchViewers,
        Metric::YoutubeViewsDaily,
        Metric::RedditMentionsDaily,
        Metric::CriticScore,
        Metric::UserScore,
        Metric::GoogleTrendsScore,
        Metric::EsportsViewers,
        Metric::SalesOrRevenueIndex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::ActivePlayers => "active_players",
            Metric::TwitchViewers => "twitch_viewers",
            Metric::YoutubeViewsDaily => "youtube_views_daily",
            Metric::RedditMentionsDaily => "reddit_mentions_daily",
            Metric::CriticScore => "critic_score",
            Metric::UserScore => "user_score",
            Metric::GoogleTrendsScore => "google_trends_score",
            Metric::EsportsViewers => "esports_viewers",
            Metric::SalesOrRevenueIndex => "sales_or_revenue_index",
        }
    }

    pub fn scale(self) -> Scale {
        match self {
            Metric::CriticScore
            | Metric::UserScore
            | Metric::GoogleTrendsScore
            | Metric::SalesOrRevenueIndex => Scale::Fixed100,
            Metric::ActivePlayers
            | Metric::TwitchViewers
            | Metric::YoutubeViewsDaily
            | Metric::RedditMentionsDaily
            | Metric::EsportsViewers => Scale::Open,
        }
    }
}

impl FromStr for Metric {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| UnknownName {
                kind: "metric",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one game for one collection cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub title: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// steam / epic / playstation / xbox / mobile / ...
    #[serde(default)]
    pub platform: Option<String>,
    /// e.g. {"steam_appid": "570"}
    #[serde(default)]
    pub external_ids: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "known_tags")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "known_tags")]
    pub mechanics: Vec<Mechanic>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub active_players: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub twitch_viewers: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub youtube_views_daily: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reddit_mentions_daily: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub esports_viewers: Option<u64>,
    /// Sales / monetization proxy, 0..100.
    #[serde(default, deserialize_with = "lenient_score")]
    pub sales_or_revenue_index: Option<f64>,
    /// OpenCritic / Metacritic, 0..100.
    #[serde(default, deserialize_with = "lenient_score")]
    pub critic_score: Option<f64>,
    /// Store reviews, 0..100.
    #[serde(default, deserialize_with = "lenient_score")]
    pub user_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub google_trends_score: Option<f64>,

    /// {"twitch": "2025-10-23T12:34:56Z", ...}
    #[serde(default)]
    pub source_timestamps: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub collected_at: Option<DateTime<Utc>>,
}

impl GameSnapshot {
    /// Empty snapshot: a title and nothing else.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            aliases: Vec::new(),
            platform: None,
            external_ids: BTreeMap::new(),
            genres: Vec::new(),
            mechanics: Vec::new(),
            active_players: None,
            twitch_viewers: None,
            youtube_views_daily: None,
            reddit_mentions_daily: None,
            esports_viewers: None,
            sales_or_revenue_index: None,
            critic_score: None,
            user_score: None,
            google_trends_score: None,
            source_timestamps: BTreeMap::new(),
            collected_at: None,
        }
    }

    /// Read a metric as a float. Non-finite values read as absent.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        let raw = match metric {
            Metric::ActivePlayers => self.active_players.map(|v| v as f64),
            Metric::TwitchViewers => self.twitch_viewers.map(|v| v as f64),
            Metric::YoutubeViewsDaily => self.youtube_views_daily.map(|v| v as f64),
            Metric::RedditMentionsDaily => self.reddit_mentions_daily.map(|v| v as f64),
            Metric::EsportsViewers => self.esports_viewers.map(|v| v as f64),
            Metric::SalesOrRevenueIndex => self.sales_or_revenue_index,
            Metric::CriticScore => self.critic_score,
            Metric::UserScore => self.user_score,
            Metric::GoogleTrendsScore => self.google_trends_score,
        };
        raw.filter(|v| v.is_finite())
    }

    /// Set (or clear) a metric. Count metrics drop the fractional part and
    /// refuse negative or non-finite input (stored as absent).
    pub fn set_metric(&mut self, metric: Metric, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        let count = value.filter(|v| *v >= 0.0).map(|v| v.trunc() as u64);
        match metric {
            Metric::ActivePlayers => self.active_players = count,
            Metric::TwitchViewers => self.twitch_viewers = count,
            Metric::YoutubeViewsDaily => self.youtube_views_daily = count,
            Metric::RedditMentionsDaily => self.reddit_mentions_daily = count,
            Metric::EsportsViewers => self.esports_viewers = count,
            Metric::SalesOrRevenueIndex => self.sales_or_revenue_index = value,
            Metric::CriticScore => self.critic_score = value,
            Metric::UserScore => self.user_score = value,
            Metric::GoogleTrendsScore => self.google_trends_score = value,
        }
    }

    /// Builder-style `set_metric`.
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        self.set_metric(metric, Some(value));
        self
    }

    pub fn with_genres(mut self, genres: impl IntoIterator<Item = Genre>) -> Self {
        self.genres = genres.into_iter().collect();
        self
    }

    pub fn with_mechanics(mut self, mechanics: impl IntoIterator<Item = Mechanic>) -> Self {
        self.mechanics = mechanics.into_iter().collect();
        self
    }
}

/// Scoring result for ranking and genre/mechanic slices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredGame {
    pub title: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub mechanics: Vec<Mechanic>,
    pub metrics: GameSnapshot,
    pub popularity_score: f64,
    /// Normalized (pre-weight) contribution per metric, each in [0,1].
    #[serde(default)]
    pub components: BTreeMap<Metric, f64>,
}

// ---- lenient deserializers ----

/// Numbers and numeric strings coerce; everything else is absent.
fn coerce_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|x| x.is_finite())
}

fn lenient_count<'de, D>(d: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref()
        .and_then(coerce_f64)
        .filter(|x| *x >= 0.0)
        .map(|x| x.trunc() as u64))
}

fn lenient_score<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(coerce_f64))
}

fn lenient_timestamp<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

fn known_tags<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
    Ok(raw
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|s| s.parse::<T>().ok())
        .collect())
}
