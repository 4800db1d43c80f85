// tests/http_local.rs
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use game_trends_bot::ingest::http::{HttpClient, RetryPolicy};
use game_trends_bot::ingest::providers::twitch::TwitchClient;
use game_trends_bot::ingest::types::CategorySource;

type Handler = Arc<dyn Fn(&str) -> (u16, String) + Send + Sync>;

/// Minimal HTTP/1.1 responder on a random local port. Every request (head
/// and body, lowercased) is recorded; `handler` maps the request target to
/// a status and JSON body.
struct StubServer {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Handler = Arc::new(handler);

        let log = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let (log, handler) = (log.clone(), handler.clone());
                tokio::spawn(async move {
                    let _ = answer(stream, log, handler).await;
                });
            }
        });
        Self { base, requests }
    }

    fn hits(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.contains(needle))
            .count()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn answer(
    mut stream: TcpStream,
    log: Arc<Mutex<Vec<String>>>,
    handler: Handler,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(i) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break i + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
    let body_len = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end + body_len {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let request = String::from_utf8_lossy(&buf).to_ascii_lowercase();
    let target = request
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();
    log.lock().unwrap().push(request);

    let (status, body) = handler(&target);
    let reason = if status == 200 { "OK" } else { "Stub" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\n\
         content-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn http(max_retries: u8) -> HttpClient {
    let retry = RetryPolicy {
        max_retries,
        base_backoff: Duration::from_millis(1),
    };
    HttpClient::new("GameTrendsBot/test", Duration::from_secs(5), retry).unwrap()
}

#[tokio::test]
async fn transient_status_is_retried_then_returned() {
    let server = StubServer::start(|_| (503, "{}".into())).await;
    let url = format!("{}/busy", server.base);

    let rsp = http(3).send(|c| c.get(&url)).await.unwrap();
    assert_eq!(rsp.status().as_u16(), 503);
    assert_eq!(server.hits("get /busy"), 4);

    let err = http(1).get_json(|c| c.get(&url)).await.unwrap_err();
    assert!(format!("{err:#}").contains("503"), "{err:#}");
    assert_eq!(server.hits("get /busy"), 6);
}

#[tokio::test]
async fn permanent_status_gets_one_attempt() {
    let server = StubServer::start(|_| (404, r#"{"error":"nope"}"#.into())).await;
    let url = format!("{}/missing", server.base);

    let rsp = http(3).send(|c| c.get(&url)).await.unwrap();
    assert_eq!(rsp.status().as_u16(), 404);
    assert_eq!(server.hits("get /missing"), 1);
}

#[tokio::test]
async fn recovers_after_transient_failures() {
    let calls = Arc::new(Mutex::new(0u32));
    let seen = calls.clone();
    let server = StubServer::start(move |_| {
        let mut n = seen.lock().unwrap();
        *n += 1;
        if *n < 3 {
            (429, "{}".into())
        } else {
            (200, r#"{"ok":true}"#.into())
        }
    })
    .await;
    let url = format!("{}/flaky", server.base);

    let body = http(3).get_json(|c| c.get(&url)).await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(*calls.lock().unwrap(), 3);
}

fn helix(expires_in: u64) -> impl Fn(&str) -> (u16, String) + Send + Sync + 'static {
    move |target: &str| {
        if target.starts_with("/oauth2/token") {
            (
                200,
                format!(r#"{{"access_token":"tok-1","expires_in":{expires_in}}}"#),
            )
        } else if target.starts_with("/helix/games/top") {
            (
                200,
                concat!(
                    r#"{"data":[{"id":"33214","name":"Fortnite"},"#,
                    r#"{"id":"509658","name":"Just Chatting"}],"pagination":{}}"#
                )
                .into(),
            )
        } else if target.starts_with("/helix/streams") {
            (
                200,
                r#"{"data":[{"viewer_count":1200},{"viewer_count":300},{"user_name":"idle"}]}"#
                    .into(),
            )
        } else {
            (404, "{}".into())
        }
    }
}

fn twitch(server: &StubServer) -> TwitchClient {
    TwitchClient::new("client-abc", "secret-xyz", http(0)).with_endpoints(
        format!("{}/oauth2/token", server.base),
        format!("{}/helix/", server.base),
    )
}

#[tokio::test]
async fn helix_calls_share_one_token() {
    let server = StubServer::start(helix(3600)).await;
    let client = twitch(&server);

    let categories = client.top_categories(500).await.unwrap();
    let ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["33214", "509658"]);

    let viewers = client.category_viewers("33214").await.unwrap();
    assert_eq!(viewers, 1500);

    assert_eq!(server.hits("post /oauth2/token"), 1);
    let reqs = server.requests();
    let token_req = reqs.iter().find(|r| r.starts_with("post /oauth2/token")).unwrap();
    assert!(token_req.contains("grant_type=client_credentials"));
    assert!(token_req.contains("client_id=client-abc"));

    let top = reqs.iter().find(|r| r.starts_with("get /helix/games/top")).unwrap();
    assert!(top.contains("first=100"), "{top}");
    let streams = reqs.iter().find(|r| r.starts_with("get /helix/streams")).unwrap();
    assert!(streams.contains("game_id=33214"));
    for r in [top, streams] {
        assert!(r.contains("authorization: bearer tok-1"), "{r}");
        assert!(r.contains("client-id: client-abc"), "{r}");
    }
}

#[tokio::test]
async fn token_inside_refresh_margin_is_renewed() {
    // 30 s lifetime is below the 60 s margin: every call fetches a new token.
    let server = StubServer::start(helix(30)).await;
    let client = twitch(&server);

    client.top_categories(10).await.unwrap();
    client.category_viewers("509658").await.unwrap();
    assert_eq!(server.hits("post /oauth2/token"), 2);
}

#[tokio::test]
async fn helix_error_status_is_an_error() {
    let server = StubServer::start(|target| {
        if target.starts_with("/oauth2/token") {
            (200, r#"{"access_token":"t"}"#.into())
        } else {
            (401, r#"{"message":"invalid token"}"#.into())
        }
    })
    .await;
    let client = twitch(&server);

    let err = client.top_categories(5).await.unwrap_err();
    assert!(format!("{err:#}").contains("games/top"), "{err:#}");
    assert!(client.category_viewers("").await.is_err());
}
