//! Text-transform capability contract.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TransformResult<T> = Result<T, TransformError>;

/// Failure of a text transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Nothing to transform.
    EmptyInput,
    /// No active provider, or the provider lacks credentials.
    NotConfigured(String),
    /// The request never produced a response.
    Transport(String),
    /// The provider answered with an error message.
    Provider { provider: String, message: String },
    /// The provider answered with a body we cannot read text from.
    InvalidResponse { provider: String, message: String },
}

impl Display for TransformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "nothing to transform"),
            Self::NotConfigured(message) => write!(f, "AI provider not configured: {message}"),
            Self::Transport(message) => write!(f, "AI request failed: {message}"),
            Self::Provider { provider, message } => write!(f, "{provider} error: {message}"),
            Self::InvalidResponse { provider, message } => {
                write!(f, "unexpected {provider} response: {message}")
            }
        }
    }
}

impl Error for TransformError {}

/// Sends a prompt and returns the completion text.
pub trait TextTransform {
    /// Stable registry id (`[a-z0-9_-]+`).
    fn provider_id(&self) -> &str;
    fn transform(&self, prompt: &str) -> TransformResult<String>;
}
