//! Gemini API client
//!
//! Provides the hosted chat model over HTTPS:
//! - Endpoint: POST /v1beta/models/{model}:generateContent
//! - Auth: `x-goog-api-key` header, key read from the environment
//! - Conversation context is resent on every call; the API is stateless

use crate::chat::service::{ChatService, ChatSession};
use crate::chat::types::{ChatTurn, Role};
use crate::config::ChatSettings;
use crate::errors::{Result, SmartMedError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Gemini API endpoint
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Default chat model
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash-exp";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Gemini HTTP client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    /// Configure a client from settings, reading the key from the environment
    pub fn from_settings(settings: &ChatSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
            SmartMedError::ChatConfigError(format!(
                "environment variable {} is not set",
                settings.api_key_env
            ))
        })?;
        Self::with_config(
            &settings.api_base,
            &settings.model,
            &api_key,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Configure a client with an explicit key
    pub fn with_config(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(SmartMedError::ChatConfigError("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SmartMedError::ChatConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Run one generateContent call over the given conversation
    pub async fn generate(&self, turns: &[ChatTurn]) -> Result<String> {
        let request = GenerateRequest {
            contents: turns.iter().map(Content::from).collect(),
        };

        debug!(model = %self.model, turns = turns.len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SmartMedError::ChatTransportError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            SmartMedError::ChatTransportError(format!("Failed to parse response: {}", e))
        })?;

        body.into_text()
    }

    /// Check the model endpoint answers with these credentials
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/v1beta/models/{}", self.base_url, self.model);
        match self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                warn!(error = %e, "Chat health check failed");
                Ok(false)
            }
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Map an HTTP failure to config (bad key) or transport errors
fn classify_failure(status: StatusCode, body: &str) -> SmartMedError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    let bad_key = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || (status == StatusCode::BAD_REQUEST && message.contains("API key"));

    if bad_key {
        SmartMedError::ChatConfigError(format!("HTTP {}: {}", status, message))
    } else {
        SmartMedError::ChatTransportError(format!("HTTP {}: {}", status, message))
    }
}

#[async_trait]
impl ChatService for GeminiClient {
    async fn start_chat(&self, history: &[ChatTurn]) -> Result<Box<dyn ChatSession>> {
        Ok(Box::new(GeminiSession {
            client: self.clone(),
            context: history.to_vec(),
        }))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Conversation held client side and replayed on each call
pub struct GeminiSession {
    client: GeminiClient,
    context: Vec<ChatTurn>,
}

#[async_trait]
impl ChatSession for GeminiSession {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        let mut turns = self.context.clone();
        turns.push(ChatTurn::user(text));

        let reply = self.client.generate(&turns).await?;

        turns.push(ChatTurn::assistant(reply.clone()));
        self.context = turns;
        Ok(reply)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl From<&ChatTurn> for Content {
    fn from(turn: &ChatTurn) -> Self {
        Content {
            role: Some(turn.role.wire_name().to_string()),
            parts: vec![Part {
                text: Some(turn.text.clone()),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(SmartMedError::ChatTransportError(format!(
                "prompt blocked: {}",
                reason
            )));
        }

        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            SmartMedError::ChatTransportError("response has no candidates".to_string())
        })?;

        if let Some(role) = candidate.content.as_ref().and_then(|c| c.role.as_deref()) {
            if Role::from_wire(role) != Some(Role::Assistant) {
                warn!(role, "Unexpected role in candidate");
            }
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(SmartMedError::ChatTransportError(format!(
                "empty reply (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::with_config(
            "https://example.test/",
            DEFAULT_CHAT_MODEL,
            "key",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_client_with_config() {
        let client = client();
        assert_eq!(client.base_url(), "https://example.test");
        assert_eq!(client.model(), DEFAULT_CHAT_MODEL);
        assert_eq!(
            client.generate_url(),
            "https://example.test/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );
    }

    #[test]
    fn test_empty_key_is_config_error() {
        let err = GeminiClient::with_config(DEFAULT_GEMINI_URL, "m", "  ", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, SmartMedError::ChatConfigError(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("\"key\""));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            contents: vec![
                Content::from(&ChatTurn::user("hello")),
                Content::from(&ChatTurn::assistant("hi there")),
            ],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][1]["parts"][0]["text"], "hi there");
    }

    #[test]
    fn test_response_text_joined() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"hi "},{"text":"there"}]},"finishReason":"STOP"}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().unwrap(), "hi there");
    }

    #[test]
    fn test_response_blocked() {
        let body = r#"{"candidates":[],"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        let err = response.into_text().unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            response.into_text().unwrap_err(),
            SmartMedError::ChatTransportError(_)
        ));
    }

    #[test]
    fn test_classify_failure() {
        let bad_key = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, bad_key),
            SmartMedError::ChatConfigError(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::FORBIDDEN, ""),
            SmartMedError::ChatConfigError(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::SERVICE_UNAVAILABLE, "overloaded"),
            SmartMedError::ChatTransportError(_)
        ));
    }

    #[tokio::test]
    async fn test_start_chat_is_local() {
        let client = client();
        let session = client.start_chat(&[]).await;
        assert!(session.is_ok());
    }
}
