// src/ingest/providers/mod.rs
pub mod epic_store;
pub mod liquipedia;
pub mod twitch;

use crate::ingest::http::HttpClient;
use crate::ingest::types::PingStatus;
use metrics::counter;

/// GET `url` with `query`; any outcome becomes a `PingStatus`.
pub(crate) async fn ping_get(
    http: &HttpClient,
    provider: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> PingStatus {
    let rsp = http.send(|c| c.get(url).query(query)).await;
    let outcome = match rsp {
        Ok(rsp) => {
            let status = rsp.status().as_u16();
            match rsp.bytes().await {
                Ok(body) => Ok((status, body.len())),
                Err(e) => Err(format!("{e:#}")),
            }
        }
        Err(e) => Err(format!("{e:#}")),
    };

    match outcome {
        Ok((status, bytes)) => PingStatus::Reachable { status, bytes },
        Err(error) => {
            tracing::warn!(provider, %error, "ping failed");
            counter!("ingest_provider_errors_total", "provider" => provider).increment(1);
            PingStatus::Failed { error }
        }
    }
}
