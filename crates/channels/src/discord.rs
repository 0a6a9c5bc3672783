//! Discord client implementation.
//!
//! Talks to the Discord REST API directly:
//! - `GET /users/@me` to resolve the identity behind a token
//! - `POST /channels/{id}/messages` to post a message
//!
//! Authentication uses the `Authorization` header with the `Bot` scheme;
//! tokens that already carry a scheme prefix are passed through unchanged.

use async_trait::async_trait;
use drumbeat_core::channel::ChannelId;
use drumbeat_core::client::{MessagingClient, SendReceipt};
use drumbeat_core::error::ClientError;
use drumbeat_core::token::{Identity, Session, Token};
use serde::Deserialize;
use tracing::{debug, trace};

const DEFAULT_BASE_URL: &str = "https://discord.com/api/v10";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Discord REST API client.
pub struct DiscordClient {
    base_url: String,
    http: reqwest::Client,
}

impl DiscordClient {
    /// Create a client against the public Discord API.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client with a specific per-request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.into(),
            http,
        })
    }

    /// Use a custom base URL (testing, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Authorization header value for a token. Raw tokens get the `Bot`
    /// scheme; tokens pasted with a scheme intact are used as-is.
    fn auth_value(token: &Token) -> String {
        let raw = token.expose();
        if raw.starts_with("Bot ") || raw.starts_with("Bearer ") {
            raw.to_string()
        } else {
            format!("Bot {raw}")
        }
    }

    /// Map a non-success HTTP response to a typed error.
    async fn error_from_response(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        match status {
            401 => ClientError::AuthenticationFailed(extract_api_message(&body)),
            429 => ClientError::RateLimited {
                retry_after_secs: extract_retry_after(&body),
            },
            _ => ClientError::ApiError {
                status_code: status,
                message: extract_api_message(&body),
            },
        }
    }

    fn transport_error(e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MessagingClient for DiscordClient {
    fn name(&self) -> &str {
        "discord"
    }

    async fn identify(&self, token: &Token) -> Result<Identity, ClientError> {
        let url = format!("{}/users/@me", self.base_url);
        trace!(url = %url, "Resolving identity");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, Self::auth_value(token))
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        let identity = Identity::new(
            user.username,
            user.discriminator.unwrap_or_else(|| "0".into()),
        );
        debug!(identity = %identity, "Identity resolved");
        Ok(identity)
    }

    async fn send(
        &self,
        session: &Session,
        channel: &ChannelId,
        content: &str,
    ) -> Result<SendReceipt, ClientError> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel);
        trace!(channel = %channel, content_len = content.len(), "Posting message");

        let response = self
            .http
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                Self::auth_value(&session.token),
            )
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let message: MessageResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        Ok(SendReceipt {
            message_id: message.id,
        })
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct UserResponse {
    username: String,
    /// Absent or null for accounts migrated off the legacy tag system.
    #[serde(default)]
    discriminator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    id: String,
}

/// Pull the human-readable `message` out of a Discord error body, falling
/// back to the raw body (truncated) when it isn't the expected JSON shape.
fn extract_api_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    body.chars().take(200).collect()
}

/// Discord reports `retry_after` as fractional seconds in the 429 body.
fn extract_retry_after(body: &str) -> u64 {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("retry_after").and_then(|r| r.as_f64()))
        .map(|secs| secs.ceil() as u64)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DiscordClient {
        DiscordClient::new().unwrap().with_base_url(server.uri())
    }

    fn session() -> Session {
        Session::new(Token::new("test-token-abcd"), Identity::new("bot", "0"))
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = DiscordClient::new()
            .unwrap()
            .with_base_url("http://localhost:9999/");
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn auth_value_adds_bot_scheme_once() {
        let auth = |raw: &str| DiscordClient::auth_value(&Token::new(raw));
        assert_eq!(auth("raw-token"), "Bot raw-token");
        assert_eq!(auth("Bot raw-token"), "Bot raw-token");
        assert_eq!(auth("Bearer oauth-token"), "Bearer oauth-token");
    }

    #[test]
    fn api_message_extraction() {
        assert_eq!(
            extract_api_message(r#"{"message": "Missing Access", "code": 50001}"#),
            "Missing Access"
        );
        assert_eq!(extract_api_message("not json"), "not json");
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(extract_retry_after(r#"{"retry_after": 1.2}"#), 2);
        assert_eq!(extract_retry_after("garbage"), 1);
    }

    #[tokio::test]
    async fn identify_resolves_legacy_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .and(header("authorization", "Bot tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "42",
                "username": "alice",
                "discriminator": "1234"
            })))
            .mount(&server)
            .await;

        let identity = client_for(&server)
            .identify(&Token::new("tok"))
            .await
            .unwrap();
        assert_eq!(identity.to_string(), "alice#1234");
    }

    #[tokio::test]
    async fn identify_handles_migrated_accounts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "42",
                "username": "modern",
                "discriminator": null
            })))
            .mount(&server)
            .await;

        let identity = client_for(&server)
            .identify(&Token::new("tok"))
            .await
            .unwrap();
        assert_eq!(identity.to_string(), "modern");
    }

    #[tokio::test]
    async fn identify_maps_401_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "401: Unauthorized"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .identify(&Token::new("bad"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn send_posts_content_and_returns_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/channels/111/messages"))
            .and(body_json(serde_json::json!({"content": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "999",
                "content": "hello"
            })))
            .mount(&server)
            .await;

        let receipt = client_for(&server)
            .send(&session(), &ChannelId::new("111"), "hello")
            .await
            .unwrap();
        assert_eq!(receipt.message_id, "999");
    }

    #[tokio::test]
    async fn send_maps_403_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/channels/111/messages"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"message": "Missing Access"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send(&session(), &ChannelId::new("111"), "hello")
            .await
            .unwrap_err();
        match err {
            ClientError::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 403);
                assert_eq!(message, "Missing Access");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_maps_429_to_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/channels/111/messages"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(serde_json::json!({"retry_after": 3.7})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send(&session(), &ChannelId::new("111"), "hello")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::RateLimited {
                retry_after_secs: 4
            }
        ));
    }
}
