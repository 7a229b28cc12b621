//! Thin Bot API client over `reqwest`.

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use super::types::{
    AnswerCallbackQuery, ApiResponse, GetUpdates, InlineKeyboardMarkup, SendMessage, SendPhoto,
    Update,
};

/// Default Bot API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Timeout for calls other than long polling.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra time granted to `getUpdates` on top of the long-poll timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Errors talking to the Bot API.
#[derive(Debug, Clone, Error)]
pub enum TelegramError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Bot API error {code:?}: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl TelegramError {
    /// Rejected token; polling cannot recover from this.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TelegramError::Api { code: Some(401), .. })
    }
}

/// Bot API client configuration.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    token: Secret<String>,
    pub base_url: String,
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    config: TelegramConfig,
    http: Client,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdates {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: &["message", "callback_query"],
        };
        self.call("getUpdates", &params, timeout + POLL_GRACE).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        let params = SendMessage {
            chat_id,
            text,
            reply_markup,
        };
        self.call::<_, serde_json::Value>("sendMessage", &params, REQUEST_TIMEOUT)
            .await
            .map(|_| ())
    }

    pub async fn send_photo(
        &self,
        chat_id: i64,
        photo: &str,
        caption: &str,
    ) -> Result<(), TelegramError> {
        let params = SendPhoto {
            chat_id,
            photo,
            caption,
        };
        self.call::<_, serde_json::Value>("sendPhoto", &params, REQUEST_TIMEOUT)
            .await
            .map(|_| ())
    }

    /// Stops the client-side spinner on a pressed button.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        let params = AnswerCallbackQuery { callback_query_id };
        self.call::<_, bool>("answerCallbackQuery", &params, REQUEST_TIMEOUT)
            .await
            .map(|_| ())
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.base_url,
            self.config.token.expose_secret(),
            method
        )
    }

    async fn call<P, R>(&self, method: &str, params: &P, timeout: Duration) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        // Errors are stripped of the URL since it embeds the token.
        let response = self
            .http
            .post(self.method_url(method))
            .timeout(timeout)
            .json(params)
            .send()
            .await
            .map_err(|e| TelegramError::Network(e.without_url().to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| TelegramError::Network(e.without_url().to_string()))?;

        parse_body(&body)
    }
}

/// Unwraps the `{ok, result}` envelope. Error statuses carry the same
/// envelope, so the HTTP status itself is not inspected.
fn parse_body<R: DeserializeOwned>(body: &str) -> Result<R, TelegramError> {
    let envelope: ApiResponse<R> = serde_json::from_str(body)
        .map_err(|e| TelegramError::Parse(format!("Failed to parse response: {}", e)))?;

    if !envelope.ok {
        return Err(TelegramError::Api {
            code: envelope.error_code,
            description: envelope.description.unwrap_or_default(),
        });
    }

    envelope
        .result
        .ok_or_else(|| TelegramError::Parse("Missing result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves one canned response and hands back the raw request.
    async fn stub_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let _ = tx.send(read_request(&mut socket).await);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), rx)
    }

    /// Reads headers plus a `Content-Length` body.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&raw).to_string()
    }

    fn client(base: String) -> TelegramClient {
        TelegramClient::new(TelegramConfig::new("123:abc").with_base_url(base))
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = TelegramConfig::new("t").with_base_url("http://localhost:8081/");
        assert_eq!(config.base_url, "http://localhost:8081");
    }

    #[test]
    fn debug_does_not_leak_token() {
        let config = TelegramConfig::new("123:very-secret");
        assert!(!format!("{:?}", config).contains("very-secret"));
    }

    #[tokio::test]
    async fn get_updates_parses_result() {
        let (base, request) = stub_server(
            "200 OK",
            r#"{"ok":true,"result":[{"update_id":7,"message":{"message_id":1,"from":{"id":2},"chat":{"id":2},"text":"/help"}}]}"#,
        )
        .await;

        let updates = client(base)
            .get_updates(Some(7), Duration::from_secs(0))
            .await
            .unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 7);
        let request = request.await.unwrap();
        assert!(request.starts_with("POST /bot123:abc/getUpdates"));
        assert!(request.contains(r#""offset":7"#));
    }

    #[tokio::test]
    async fn api_error_is_reported() {
        let (base, _) = stub_server(
            "401 Unauthorized",
            r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#,
        )
        .await;

        let err = client(base)
            .send_message(1, "hi", None)
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn network_error_hides_token() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}", addr))
            .send_message(1, "hi", None)
            .await
            .unwrap_err();

        assert!(matches!(err, TelegramError::Network(_)));
        assert!(!err.to_string().contains("123:abc"));
    }

    #[test]
    fn garbage_body_is_parse_error() {
        let err = parse_body::<bool>("<html>").unwrap_err();
        assert!(matches!(err, TelegramError::Parse(_)));
    }
}
