use anyhow::Result;
use async_trait::async_trait;

use crate::ingest::http::HttpClient;
use crate::ingest::providers::ping_get;
use crate::ingest::types::{HealthProbe, PingStatus};

/// Epic Games Store promotions feed (free games / discounts).
#[derive(Clone)]
pub struct EpicStoreClient {
    promotions_url: String,
    http: HttpClient,
}

impl EpicStoreClient {
    pub fn new(promotions_url: impl Into<String>, http: HttpClient) -> Self {
        Self {
            promotions_url: promotions_url.into(),
            http,
        }
    }

    pub fn promotions_url(&self) -> &str {
        &self.promotions_url
    }

    /// Current promotions payload, as returned by the store.
    pub async fn free_promotions(&self) -> Result<serde_json::Value> {
        self.http.get_json(|c| c.get(&self.promotions_url)).await
    }
}

#[async_trait]
impl HealthProbe for EpicStoreClient {
    async fn ping(&self) -> PingStatus {
        ping_get(&self.http, self.name(), &self.promotions_url, &[]).await
    }

    fn name(&self) -> &'static str {
        "epic_store"
    }
}
