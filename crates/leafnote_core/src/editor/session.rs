//! Editor session for one open page.
//!
//! # Responsibility
//! - Execute block operations and the key protocol on a [`BlockDocument`].
//! - Persist the serialized document through the injected page repository,
//!   immediately for structural changes and debounced for typing.
//! - Render blocks, resolving `[[links]]` through the injected resolver.
//!
//! # Invariants
//! - At most one debounced write is pending; any immediate write cancels it.
//! - `close` flushes a pending debounced write, so no typed change is lost
//!   on navigation.
//! - Failed writes are logged and never retried.

use super::debounce::{Clock, Debouncer, SystemClock, DEFAULT_DEBOUNCE};
use super::document::BlockDocument;
use super::protocol::{classify, KeyCommand, KeyOutcome};
use crate::markdown::{decorate_wiki_links, ComrakRenderer, LinkResolver, MarkdownRenderer};
use crate::model::page::PageId;
use crate::model::settings::Settings;
use crate::repo::page_repo::PageRepository;
use crate::repo::RepoError;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Session tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Quiet period before typed changes are written.
    pub debounce: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl EditorConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            debounce: settings.autosave_delay(),
        }
    }
}

/// Errors raised while opening a session.
#[derive(Debug)]
pub enum EditorError {
    PageNotFound(PageId),
    Repo(RepoError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageNotFound(id) => write!(f, "cannot open page {id}: not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::PageNotFound(_) => None,
        }
    }
}

impl From<RepoError> for EditorError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PageNotFound(id) => Self::PageNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Presentation of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockView {
    /// Block is in edit mode: raw markdown for a text input.
    Editing { raw: String },
    /// Block is rendered to HTML.
    Rendered { html: String },
}

/// Where an externally produced text (AI result, transcript) goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Replace the selected blocks, or the whole page when nothing is selected.
    Replace,
    /// Add a new block after the selection, or at the end of the page.
    InsertBelow,
}

/// Open page with its block document and persistence wiring.
pub struct EditorSession<R: PageRepository, L: LinkResolver, C: Clock = SystemClock> {
    page_id: PageId,
    document: BlockDocument,
    repo: R,
    resolver: L,
    renderer: ComrakRenderer,
    clock: C,
    debouncer: Debouncer,
    writes: usize,
}

impl<R: PageRepository, L: LinkResolver> EditorSession<R, L, SystemClock> {
    /// Opens `page_id` with the wall clock and default config.
    pub fn open(repo: R, resolver: L, page_id: PageId) -> Result<Self, EditorError> {
        Self::open_with(repo, resolver, page_id, SystemClock, EditorConfig::default())
    }
}

impl<R: PageRepository, L: LinkResolver, C: Clock> EditorSession<R, L, C> {
    /// Opens `page_id`, deserializing its content into blocks.
    pub fn open_with(
        repo: R,
        resolver: L,
        page_id: PageId,
        clock: C,
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        let page = repo
            .get_page(page_id)?
            .ok_or(EditorError::PageNotFound(page_id))?;
        let document = BlockDocument::deserialize(&page.content);
        info!(
            "event=editor_open module=editor status=ok page_id={page_id} blocks={}",
            document.len()
        );

        Ok(Self {
            page_id,
            document,
            repo,
            resolver,
            renderer: ComrakRenderer::new(),
            clock,
            debouncer: Debouncer::new(config.debounce),
            writes: 0,
        })
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn document(&self) -> &BlockDocument {
        &self.document
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Current serialized page content.
    pub fn serialized(&self) -> String {
        self.document.serialize()
    }

    /// Number of successful writes issued by this session.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn has_pending_write(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Commits any block in edit mode, then puts `index` in edit mode.
    ///
    /// Out-of-range indices change nothing.
    pub fn edit_block(&mut self, index: usize) -> bool {
        if index >= self.document.len() {
            return false;
        }
        self.finish_edit();
        self.document.begin_edit(index)
    }

    /// Leaves edit mode and writes immediately. No-op when nothing is edited.
    pub fn finish_edit(&mut self) -> Option<usize> {
        let index = self.document.end_edit()?;
        self.persist_now();
        Some(index)
    }

    /// Live text change from the input; schedules a debounced write.
    pub fn update_content(&mut self, index: usize, content: impl Into<String>) -> bool {
        if !self.document.set_content(index, content) {
            return false;
        }
        self.schedule_persist();
        true
    }

    /// Runs the key protocol for the block at `index` with the caret at
    /// character offset `cursor`.
    pub fn handle_key(&mut self, command: KeyCommand, index: usize, cursor: usize) -> KeyOutcome {
        let outcome = classify(&self.document, command, index, cursor);
        match outcome {
            KeyOutcome::Ignored => {}
            KeyOutcome::Split { index, new_index } => {
                let tail = self
                    .document
                    .split_off(index, cursor)
                    .unwrap_or_default();
                self.finish_edit();
                self.insert_block(new_index, tail);
                self.edit_block(new_index);
            }
            KeyOutcome::NewBlockBelow { new_index, .. } => {
                self.finish_edit();
                self.insert_block(new_index, "");
                self.edit_block(new_index);
            }
            KeyOutcome::RemovedEmpty { removed, focus } => {
                self.delete_block(removed);
                self.edit_block(focus);
            }
            KeyOutcome::FocusMoved { to, .. } => {
                self.finish_edit();
                self.edit_block(to);
            }
            KeyOutcome::Exited { .. } => {
                self.finish_edit();
            }
        }
        debug!(
            "event=editor_key module=editor status=ok page_id={} command={command:?} outcome={outcome:?}",
            self.page_id
        );
        outcome
    }

    /// Inserts a block and writes immediately. Returns the block's index.
    pub fn insert_block(&mut self, at: usize, content: impl Into<String>) -> usize {
        let index = self.document.insert_block(at, content);
        self.persist_now();
        index
    }

    /// Removes (or, for the last block, clears) one block and writes
    /// immediately.
    pub fn delete_block(&mut self, index: usize) -> bool {
        if !self.document.delete_block(index) {
            return false;
        }
        self.persist_now();
        true
    }

    /// Selection bookkeeping only; never writes.
    pub fn toggle_selection(&mut self, index: usize, selected: bool) -> bool {
        self.document.toggle_selection(index, selected)
    }

    /// Deletes every selected block and writes immediately.
    pub fn delete_selected(&mut self) -> usize {
        let affected = self.document.delete_selected();
        if affected > 0 {
            self.persist_now();
        }
        affected
    }

    /// Appends `text` to the edited block (re-opening it afterwards), or to
    /// the last block when nothing is edited.
    pub fn insert_at_cursor(&mut self, text: &str) {
        match self.document.edit_index() {
            Some(index) => {
                self.document.append_to(index, text);
                self.finish_edit();
                self.document.begin_edit(index);
            }
            None => {
                let last = self.document.len() - 1;
                self.document.append_to(last, text);
                self.schedule_persist();
            }
        }
    }

    /// Inserts a `[[title]]` link at the cursor.
    pub fn insert_page_link(&mut self, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            return;
        }
        self.insert_at_cursor(&format!("[[{title}]]"));
    }

    /// Source text for transforms: the selected blocks, or the whole page.
    pub fn transform_source(&self) -> String {
        if self.document.selected_indices().is_empty() {
            self.serialized()
        } else {
            self.document.selected_text()
        }
    }

    /// Places externally produced text into the document and writes
    /// immediately. Multi-paragraph text becomes one block per paragraph,
    /// exactly as it would after a reload.
    pub fn apply_text(&mut self, text: &str, mode: ApplyMode) {
        let selected = self.document.selected_indices();
        self.document.end_edit();
        match (mode, selected.first().copied()) {
            (ApplyMode::Replace, None) => self.document.replace_all(text),
            (ApplyMode::Replace, Some(_)) if selected.len() == self.document.len() => {
                self.document.replace_all(text);
            }
            (ApplyMode::Replace, Some(first)) => {
                self.document.delete_selected();
                self.document.insert_parsed(first, text);
            }
            (ApplyMode::InsertBelow, None) => {
                self.document.insert_parsed(self.document.len(), text);
            }
            (ApplyMode::InsertBelow, Some(_)) => {
                let after = selected.last().map_or(self.document.len(), |last| last + 1);
                self.document.clear_selection();
                self.document.insert_parsed(after, text);
            }
        }
        self.persist_now();
    }

    /// Presentation of one block; `None` when out of range.
    pub fn render_block(&self, index: usize) -> Option<BlockView> {
        let content = self.document.content(index)?;
        if self.document.is_editing(index) {
            return Some(BlockView::Editing {
                raw: content.to_string(),
            });
        }
        let linked = decorate_wiki_links(content, &self.resolver);
        Some(BlockView::Rendered {
            html: self.renderer.render(&linked),
        })
    }

    pub fn render_all(&self) -> Vec<BlockView> {
        (0..self.document.len())
            .filter_map(|index| self.render_block(index))
            .collect()
    }

    /// Performs the debounced write once its quiet period has elapsed.
    pub fn tick(&mut self) -> bool {
        if !self.debouncer.fire_if_due(self.clock.now()) {
            return false;
        }
        self.write();
        true
    }

    /// Writes a pending debounced change now.
    pub fn flush(&mut self) -> bool {
        if !self.debouncer.cancel() {
            return false;
        }
        self.write();
        true
    }

    /// Commits edit mode, flushes pending changes and hands back the repo.
    pub fn close(mut self) -> R {
        if self.finish_edit().is_none() {
            self.flush();
        }
        info!(
            "event=editor_close module=editor status=ok page_id={} writes={}",
            self.page_id, self.writes
        );
        self.repo
    }

    fn schedule_persist(&mut self) {
        self.debouncer.schedule(self.clock.now());
    }

    fn persist_now(&mut self) {
        self.debouncer.cancel();
        self.write();
    }

    fn write(&mut self) {
        let content = self.document.serialize();
        match self.repo.update_content(self.page_id, &content) {
            Ok(()) => {
                self.writes += 1;
                debug!(
                    "event=page_persist module=editor status=ok page_id={} bytes={}",
                    self.page_id,
                    content.len()
                );
            }
            Err(err) => {
                error!(
                    "event=page_persist module=editor status=error page_id={} error_code=page_write_failed error={err}",
                    self.page_id
                );
            }
        }
    }
}

