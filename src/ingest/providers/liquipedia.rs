use anyhow::Result;
use async_trait::async_trait;

use crate::ingest::http::HttpClient;
use crate::ingest::providers::ping_get;
use crate::ingest::types::{HealthProbe, PingStatus};

/// Term used for the availability probe.
const PING_TERM: &str = "Fortnite";

/// Liquipedia (MediaWiki) search API.
#[derive(Clone)]
pub struct LiquipediaClient {
    base_url: String,
    http: HttpClient,
}

impl LiquipediaClient {
    pub fn new(base_url: impl Into<String>, http: HttpClient) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    /// Full-text search; returns the raw API payload.
    pub async fn search(&self, term: &str, limit: u32) -> Result<serde_json::Value> {
        let limit = limit.to_string();
        let query = search_query(term, Some(&limit));
        self.http
            .get_json(|c| c.get(&self.base_url).query(&query))
            .await
    }

    /// Page titles from a search payload (`query.search[].title`).
    pub fn search_titles(payload: &serde_json::Value) -> Vec<String> {
        payload
            .pointer("/query/search")
            .and_then(|v| v.as_array())
            .map(|hits| {
                hits.iter()
                    .filter_map(|h| h.get("title").and_then(|t| t.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn search_query<'a>(term: &'a str, limit: Option<&'a str>) -> Vec<(&'static str, &'a str)> {
    let mut q = vec![
        ("action", "query"),
        ("format", "json"),
        ("list", "search"),
        ("srsearch", term),
    ];
    if let Some(l) = limit {
        q.push(("srlimit", l));
    }
    q
}

#[async_trait]
impl HealthProbe for LiquipediaClient {
    async fn ping(&self) -> PingStatus {
        let query = search_query(PING_TERM, None);
        ping_get(&self.http, self.name(), &self.base_url, &query).await
    }

    fn name(&self) -> &'static str {
        "liquipedia"
    }
}
