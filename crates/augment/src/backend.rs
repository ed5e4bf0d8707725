use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{truncate, AugmentError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL: &str = "microsoft/DialoGPT-medium";

/// Abstraction over a text-generation service.
/// Implementations take a prompt and return the generated text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// ── HTTP backend ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_length: u32,
    temperature: f32,
}

/// Client for a hosted text-generation inference endpoint
/// (`POST {base_url}/{model}`, bearer auth).
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpCompletionClient {
    /// `timeout` bounds the whole request, connect included.
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.trim_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters { max_length: 200, temperature: 0.1 },
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AugmentError::Status { status: status.as_u16(), body: truncate(&body) });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "completion received");
        generated_text(&body)
    }
}

/// Pull the generated text out of a response body.
///
/// Accepts `[{"generated_text": …}]`, `{"generated_text": …}`, or a bare
/// JSON string. Anything else is handed back as-is for the JSON scanner.
pub fn generated_text(body: &str) -> Result<String> {
    fn field(item: &Value) -> Option<String> {
        item.get("generated_text").and_then(Value::as_str).map(str::to_string)
    }

    let text = match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => items.first().and_then(field),
        Ok(ref object @ Value::Object(_)) => field(object),
        Ok(Value::String(s)) => Some(s),
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    };
    text.filter(|t| !t.trim().is_empty()).ok_or(AugmentError::EmptyResponse)
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Scripted backend for exercising the overlay without a network.
#[derive(Debug, Clone)]
pub enum MockCompletion {
    /// Reply with this text.
    Reply(String),
    /// Fail as if the service answered 503.
    Fail,
    /// Sleep before replying, to trip timeouts.
    Stall(Duration, String),
}

impl MockCompletion {
    pub fn reply(text: impl Into<String>) -> Self {
        MockCompletion::Reply(text.into())
    }
}

#[async_trait]
impl CompletionBackend for MockCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        match self {
            MockCompletion::Reply(text) => Ok(text.clone()),
            MockCompletion::Fail => Err(AugmentError::Status {
                status: 503,
                body: "model is loading".to_string(),
            }),
            MockCompletion::Stall(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(text.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on a local port and return the base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                    let len = headers
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= pos + 4 + len {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> HttpCompletionClient {
        HttpCompletionClient::new(base_url, "test/model", "secret", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let c = HttpCompletionClient::new(
            "https://example.test/models/",
            "/org/model",
            "k",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(c.endpoint(), "https://example.test/models/org/model");
    }

    #[test]
    fn generated_text_shapes() {
        assert_eq!(generated_text(r#"[{"generated_text": "hi"}]"#).unwrap(), "hi");
        assert_eq!(generated_text(r#"{"generated_text": "hi"}"#).unwrap(), "hi");
        assert_eq!(generated_text(r#""hi""#).unwrap(), "hi");
        assert_eq!(generated_text("plain words").unwrap(), "plain words");
    }

    #[test]
    fn generated_text_empty_or_missing() {
        assert!(matches!(generated_text("[]"), Err(AugmentError::EmptyResponse)));
        assert!(matches!(generated_text(r#"[{"other": 1}]"#), Err(AugmentError::EmptyResponse)));
        assert!(matches!(generated_text("42"), Err(AugmentError::EmptyResponse)));
        assert!(matches!(generated_text("  "), Err(AugmentError::EmptyResponse)));
    }

    #[tokio::test]
    async fn http_success_returns_generated_text() {
        let base = serve_once("200 OK", r#"[{"generated_text": "{\"amount\": 9}"}]"#).await;
        let text = client(&base).complete("prompt").await.unwrap();
        assert_eq!(text, r#"{"amount": 9}"#);
    }

    #[tokio::test]
    async fn http_error_status_is_reported() {
        let base = serve_once("503 Service Unavailable", r#"{"error": "loading"}"#).await;
        let err = client(&base).complete("prompt").await.unwrap_err();
        assert!(matches!(err, AugmentError::Status { status: 503, .. }), "got {err}");
    }

    #[tokio::test]
    async fn http_connection_refused_is_an_error() {
        // Nothing listens on port 1.
        let err = client("http://127.0.0.1:1").complete("prompt").await.unwrap_err();
        assert!(matches!(err, AugmentError::Http(_)), "got {err}");
    }

    #[tokio::test]
    async fn mock_variants() {
        assert_eq!(MockCompletion::reply("x").complete("p").await.unwrap(), "x");
        assert!(MockCompletion::Fail.complete("p").await.is_err());
        let stalled = MockCompletion::Stall(Duration::from_millis(5), "late".into());
        assert_eq!(stalled.complete("p").await.unwrap(), "late");
    }
}
