//! Twitch Helix adapter: top categories and their live audience.
//!
//! Auth is the app-access (client credentials) flow. The token is cached
//! and refreshed 60 s before it expires.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::ingest::http::HttpClient;
use crate::ingest::types::{Category, CategorySource};

pub const TWITCH_OAUTH_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const TWITCH_API_BASE: &str = "https://api.twitch.tv/helix";

/// Helix caps `first` at 100.
const MAX_PAGE: usize = 100;
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct GameEntry {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct StreamEntry {
    #[serde(default)]
    viewer_count: u64,
}

pub struct TwitchClient {
    client_id: String,
    client_secret: String,
    oauth_url: String,
    api_base: String,
    http: HttpClient,
    token: Mutex<Option<AccessToken>>,
}

impl TwitchClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        http: HttpClient,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            oauth_url: TWITCH_OAUTH_URL.to_string(),
            api_base: TWITCH_API_BASE.to_string(),
            http,
            token: Mutex::new(None),
        }
    }

    /// Point the client at other endpoints (staging, local mocks).
    pub fn with_endpoints(
        mut self,
        oauth_url: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        self.oauth_url = oauth_url.into();
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn bearer(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(tok) = guard.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(tok.value.clone());
        }

        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];
        let rsp = self
            .http
            .send(|c| c.post(&self.oauth_url).form(&form))
            .await
            .context("twitch oauth request")?
            .error_for_status()
            .context("twitch oauth status")?;
        let body: TokenResponse = rsp.json().await.context("twitch oauth body")?;

        let ttl = body.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        let tok = AccessToken {
            value: body.access_token,
            expires_at: Instant::now() + Duration::from_secs(ttl),
        };
        tracing::debug!(ttl_secs = ttl, "twitch token refreshed");
        let value = tok.value.clone();
        *guard = Some(tok);
        Ok(value)
    }

    async fn helix_get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        let token = self.bearer().await?;
        let url = format!("{}/{}", self.api_base, path);
        let rsp = self
            .http
            .send(|c| {
                c.get(&url)
                    .query(query)
                    .header("Client-Id", &self.client_id)
                    .bearer_auth(&token)
            })
            .await
            .with_context(|| format!("twitch GET {path}"))?
            .error_for_status()
            .with_context(|| format!("twitch GET {path} status"))?;
        rsp.json::<Page<T>>()
            .await
            .with_context(|| format!("twitch GET {path} body"))
    }
}

#[async_trait]
impl CategorySource for TwitchClient {
    async fn top_categories(&self, first: usize) -> Result<Vec<Category>> {
        let first = first.clamp(1, MAX_PAGE).to_string();
        let page: Page<GameEntry> = self.helix_get("games/top", &[("first", first)]).await?;
        Ok(page
            .data
            .into_iter()
            .map(|g| Category {
                id: g.id,
                name: g.name,
            })
            .collect())
    }

    /// Sum of viewers over the first 100 live streams; enough for top
    /// categories, an undercount for the long tail.
    async fn category_viewers(&self, category_id: &str) -> Result<u64> {
        if category_id.is_empty() {
            return Err(anyhow!("empty category id"));
        }
        let page: Page<StreamEntry> = self
            .helix_get(
                "streams",
                &[
                    ("game_id", category_id.to_string()),
                    ("first", MAX_PAGE.to_string()),
                ],
            )
            .await?;
        Ok(sum_viewers(&page.data))
    }

    fn name(&self) -> &'static str {
        "twitch"
    }
}

fn sum_viewers(streams: &[StreamEntry]) -> u64 {
    streams.iter().map(|s| s.viewer_count).sum()
}
