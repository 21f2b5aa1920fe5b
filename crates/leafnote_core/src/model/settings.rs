//! User settings record.
//!
//! # Invariants
//! - Missing fields deserialize to defaults, so older records stay readable.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 500;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";

/// Supported AI completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
}

impl AiProviderKind {
    /// Stable id used by the transform registry.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }
}

/// Application settings persisted under the `settings` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Provider used by AI transforms; `None` disables them.
    pub ai_provider: Option<AiProviderKind>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_model: String,
    pub gemini_model: String,
    /// BCP-47 tag passed to speech capture.
    pub speech_language: String,
    /// Quiet period before a typed change is written.
    pub autosave_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai_provider: None,
            openai_api_key: None,
            anthropic_api_key: None,
            gemini_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            speech_language: DEFAULT_SPEECH_LANGUAGE.to_string(),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
        }
    }
}

impl Settings {
    /// Returns the non-blank API key configured for `kind`.
    pub fn api_key(&self, kind: AiProviderKind) -> Option<&str> {
        let key = match kind {
            AiProviderKind::OpenAi => self.openai_api_key.as_deref(),
            AiProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
            AiProviderKind::Gemini => self.gemini_api_key.as_deref(),
        };
        key.map(str::trim).filter(|value| !value.is_empty())
    }

    /// Returns the model configured for `kind`.
    pub fn model(&self, kind: AiProviderKind) -> &str {
        match kind {
            AiProviderKind::OpenAi => &self.openai_model,
            AiProviderKind::Anthropic => &self.anthropic_model,
            AiProviderKind::Gemini => &self.gemini_model,
        }
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}
