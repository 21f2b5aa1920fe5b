//! Chat-completion providers behind the [`TextTransform`] contract.
//!
//! Each provider only shapes the JSON request and reads the JSON response;
//! sending it is the job of the injected [`HttpTransport`].

use super::transform::{TextTransform, TransformError, TransformResult};
use crate::model::settings::{AiProviderKind, Settings};
use serde_json::{json, Value};
use std::sync::Arc;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;
const GEMINI_URL_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Outgoing JSON POST.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// JSON response as seen by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

/// Network capability used by providers.
pub trait HttpTransport {
    /// Sends one request. `Err` means no response was received.
    fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

/// [`TextTransform`] for one hosted chat API.
pub struct ChatProvider {
    kind: AiProviderKind,
    api_key: String,
    model: String,
    transport: Arc<dyn HttpTransport>,
}

impl ChatProvider {
    pub fn new(
        kind: AiProviderKind,
        api_key: impl Into<String>,
        model: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            kind,
            api_key: api_key.into(),
            model: model.into(),
            transport,
        }
    }

    /// Builds a provider from settings. `None` when no API key is set.
    pub fn from_settings(
        kind: AiProviderKind,
        settings: &Settings,
        transport: Arc<dyn HttpTransport>,
    ) -> Option<Self> {
        let api_key = settings.api_key(kind)?;
        Some(Self::new(kind, api_key, settings.model(kind), transport))
    }

    pub fn kind(&self) -> AiProviderKind {
        self.kind
    }

    /// Request for `prompt` in this provider's wire shape.
    pub fn build_request(&self, prompt: &str) -> HttpRequest {
        let content_type = ("Content-Type".to_string(), "application/json".to_string());
        match self.kind {
            AiProviderKind::OpenAi => HttpRequest {
                url: OPENAI_URL.to_string(),
                headers: vec![
                    content_type,
                    (
                        "Authorization".to_string(),
                        format!("Bearer {}", self.api_key),
                    ),
                ],
                body: json!({
                    "model": self.model,
                    "messages": [{ "role": "user", "content": prompt }],
                }),
            },
            AiProviderKind::Anthropic => HttpRequest {
                url: ANTHROPIC_URL.to_string(),
                headers: vec![
                    content_type,
                    ("x-api-key".to_string(), self.api_key.clone()),
                    (
                        "anthropic-version".to_string(),
                        ANTHROPIC_VERSION.to_string(),
                    ),
                ],
                body: json!({
                    "model": self.model,
                    "max_tokens": ANTHROPIC_MAX_TOKENS,
                    "messages": [{ "role": "user", "content": prompt }],
                }),
            },
            AiProviderKind::Gemini => HttpRequest {
                url: format!("{GEMINI_URL_BASE}/{}:generateContent", self.model),
                headers: vec![
                    content_type,
                    ("x-goog-api-key".to_string(), self.api_key.clone()),
                ],
                body: json!({
                    "contents": [{ "parts": [{ "text": prompt }] }],
                }),
            },
        }
    }

    /// Extracts completion text, or the provider's error message.
    pub fn parse_response(&self, response: &HttpResponse) -> TransformResult<String> {
        if let Some(message) = error_message(&response.body) {
            return Err(self.provider_error(message));
        }
        if response.status >= 400 {
            return Err(self.provider_error(format!("HTTP status {}", response.status)));
        }

        let text = match self.kind {
            AiProviderKind::OpenAi => response.body["choices"][0]["message"]["content"].as_str(),
            AiProviderKind::Anthropic => response.body["content"]
                .as_array()
                .and_then(|parts| {
                    parts
                        .iter()
                        .find(|part| part["type"].as_str() == Some("text"))
                })
                .and_then(|part| part["text"].as_str()),
            AiProviderKind::Gemini => {
                response.body["candidates"][0]["content"]["parts"][0]["text"].as_str()
            }
        };

        text.map(|text| text.trim().to_string())
            .ok_or_else(|| TransformError::InvalidResponse {
                provider: self.kind.as_str().to_string(),
                message: "no completion text in response".to_string(),
            })
    }

    fn provider_error(&self, message: String) -> TransformError {
        TransformError::Provider {
            provider: self.kind.as_str().to_string(),
            message,
        }
    }
}

impl TextTransform for ChatProvider {
    fn provider_id(&self) -> &str {
        self.kind.as_str()
    }

    fn transform(&self, prompt: &str) -> TransformResult<String> {
        let request = self.build_request(prompt);
        let response = self
            .transport
            .post_json(&request)
            .map_err(TransformError::Transport)?;
        self.parse_response(&response)
    }
}

fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    let message = error["message"]
        .as_str()
        .or_else(|| error.as_str())
        .unwrap_or("unknown provider error");
    Some(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::{ChatProvider, HttpRequest, HttpResponse, HttpTransport};
    use crate::ai::transform::TransformError;
    use crate::model::settings::{AiProviderKind, Settings};
    use serde_json::json;
    use std::sync::Arc;

    struct Unreachable;

    impl HttpTransport for Unreachable {
        fn post_json(&self, _request: &HttpRequest) -> Result<HttpResponse, String> {
            Err("offline".to_string())
        }
    }

    fn provider(kind: AiProviderKind) -> ChatProvider {
        ChatProvider::new(kind, "sk-test", "model-x", Arc::new(Unreachable))
    }

    #[test]
    fn openai_request_uses_bearer_auth_and_chat_messages() {
        let request = provider(AiProviderKind::OpenAi).build_request("hello");
        assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
        assert_eq!(request.body["messages"][0]["content"], "hello");
        assert_eq!(request.body["model"], "model-x");
    }

    #[test]
    fn anthropic_request_sets_version_and_max_tokens() {
        let request = provider(AiProviderKind::Anthropic).build_request("hello");
        assert_eq!(request.header("x-api-key"), Some("sk-test"));
        assert_eq!(request.header("anthropic-version"), Some("2023-06-01"));
        assert_eq!(request.body["max_tokens"], 1024);
    }

    #[test]
    fn gemini_request_puts_model_in_url_and_key_in_header() {
        let request = provider(AiProviderKind::Gemini).build_request("hello");
        assert!(request.url.ends_with("/models/model-x:generateContent"));
        assert!(!request.url.contains("sk-test"));
        assert_eq!(request.body["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn parses_each_provider_response_shape() {
        let openai = HttpResponse {
            status: 200,
            body: json!({"choices": [{"message": {"content": " done "}}]}),
        };
        let anthropic = HttpResponse {
            status: 200,
            body: json!({"content": [{"type": "text", "text": "done"}]}),
        };
        let gemini = HttpResponse {
            status: 200,
            body: json!({"candidates": [{"content": {"parts": [{"text": "done"}]}}]}),
        };
        assert_eq!(provider(AiProviderKind::OpenAi).parse_response(&openai).unwrap(), "done");
        assert_eq!(
            provider(AiProviderKind::Anthropic).parse_response(&anthropic).unwrap(),
            "done"
        );
        assert_eq!(provider(AiProviderKind::Gemini).parse_response(&gemini).unwrap(), "done");
    }

    #[test]
    fn error_body_becomes_provider_error() {
        let response = HttpResponse {
            status: 401,
            body: json!({"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}}),
        };
        let err = provider(AiProviderKind::Anthropic)
            .parse_response(&response)
            .unwrap_err();
        assert_eq!(
            err,
            TransformError::Provider {
                provider: "anthropic".to_string(),
                message: "invalid x-api-key".to_string(),
            }
        );
    }

    #[test]
    fn from_settings_requires_api_key() {
        let settings = Settings::default();
        assert!(
            ChatProvider::from_settings(AiProviderKind::OpenAi, &settings, Arc::new(Unreachable))
                .is_none()
        );
    }
}
