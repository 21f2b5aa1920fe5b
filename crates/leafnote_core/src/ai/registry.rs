//! Registry of configured text-transform providers and the active choice.

use super::providers::{ChatProvider, HttpTransport};
use super::transform::{TextTransform, TransformError, TransformResult};
use crate::model::settings::{AiProviderKind, Settings};
use log::warn;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Registration and selection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformRegistryError {
    InvalidProviderId(String),
    DuplicateProviderId(String),
    ProviderNotFound(String),
}

impl Display for TransformRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProviderId(value) => write!(f, "invalid transform provider id: {value}"),
            Self::DuplicateProviderId(value) => {
                write!(f, "transform provider registered twice: {value}")
            }
            Self::ProviderNotFound(value) => write!(f, "unknown transform provider: {value}"),
        }
    }
}

impl Error for TransformRegistryError {}

#[derive(Default)]
pub struct TransformRegistry {
    providers: BTreeMap<String, Arc<dyn TextTransform>>,
    active: Option<String>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every provider that has an API key and activates the one
    /// chosen in settings, if it was registered.
    pub fn from_settings(settings: &Settings, transport: Arc<dyn HttpTransport>) -> Self {
        let mut registry = Self::new();
        for kind in [
            AiProviderKind::OpenAi,
            AiProviderKind::Anthropic,
            AiProviderKind::Gemini,
        ] {
            if let Some(provider) = ChatProvider::from_settings(kind, settings, transport.clone()) {
                if let Err(err) = registry.register(Arc::new(provider)) {
                    warn!("event=ai_registry module=ai status=error error={err}");
                }
            }
        }

        if let Some(kind) = settings.ai_provider {
            if registry.select_active(kind.as_str()).is_err() {
                warn!(
                    "event=ai_registry module=ai status=missing_key provider={}",
                    kind.as_str()
                );
            }
        }
        registry
    }

    pub fn register(
        &mut self,
        provider: Arc<dyn TextTransform>,
    ) -> Result<(), TransformRegistryError> {
        let id = provider.provider_id().trim().to_string();
        if !is_valid_provider_id(&id) {
            return Err(TransformRegistryError::InvalidProviderId(id));
        }
        if self.providers.contains_key(&id) {
            return Err(TransformRegistryError::DuplicateProviderId(id));
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn select_active(&mut self, provider_id: &str) -> Result<(), TransformRegistryError> {
        let id = provider_id.trim();
        if !self.providers.contains_key(id) {
            return Err(TransformRegistryError::ProviderNotFound(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn active_provider_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn TextTransform>> {
        self.providers.get(provider_id.trim()).cloned()
    }

    /// Sorted provider ids.
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Runs `prompt` through the active provider.
    pub fn transform_active(&self, prompt: &str) -> TransformResult<String> {
        let provider = self
            .active
            .as_deref()
            .and_then(|id| self.get(id))
            .ok_or_else(|| TransformError::NotConfigured("no active provider".to_string()))?;
        provider.transform(prompt)
    }
}

fn is_valid_provider_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
