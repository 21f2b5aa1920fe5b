//! Runs transform actions against the active provider and feeds results
//! back into an editor session.

use super::actions::TransformAction;
use super::registry::TransformRegistry;
use super::transform::{TransformError, TransformResult};
use crate::editor::debounce::Clock;
use crate::editor::session::{ApplyMode, EditorSession};
use crate::markdown::LinkResolver;
use crate::repo::page_repo::PageRepository;
use log::{info, warn};
use std::time::Instant;

pub struct TransformService {
    registry: TransformRegistry,
}

impl TransformService {
    pub fn new(registry: TransformRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TransformRegistry {
        &mut self.registry
    }

    /// Transforms `text` with `action`. Blank input never reaches a provider.
    pub fn run(&self, action: &TransformAction, text: &str) -> TransformResult<String> {
        if text.trim().is_empty() {
            return Err(TransformError::EmptyInput);
        }

        let started = Instant::now();
        let provider = self.registry.active_provider_id().unwrap_or("none");
        let result = self.registry.transform_active(&action.build_prompt(text));
        let elapsed_ms = started.elapsed().as_millis();
        match &result {
            Ok(output) => info!(
                "event=ai_transform module=ai status=ok provider={provider} action={} input_chars={} output_chars={} duration_ms={elapsed_ms}",
                action.as_str(),
                text.chars().count(),
                output.chars().count()
            ),
            Err(err) => warn!(
                "event=ai_transform module=ai status=error provider={provider} action={} duration_ms={elapsed_ms} error={err}",
                action.as_str()
            ),
        }
        result
    }

    /// Transforms the session's selection (or whole page) and places the
    /// result according to `mode`. The document is untouched on failure.
    pub fn apply_to_session<R, L, C>(
        &self,
        session: &mut EditorSession<R, L, C>,
        action: &TransformAction,
        mode: ApplyMode,
    ) -> TransformResult<String>
    where
        R: PageRepository,
        L: LinkResolver,
        C: Clock,
    {
        let output = self.run(action, &session.transform_source())?;
        session.apply_text(&output, mode);
        Ok(output)
    }
}
