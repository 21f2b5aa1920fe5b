//! Core of the LeafNote note-taking app: the block document model and its
//! editing protocol, page/folder storage, wiki links and AI transforms.
//!
//! UI shells drive an [`EditorSession`] and render the [`BlockView`]s it
//! returns; everything they persist goes through a [`KvStore`].

pub mod ai;
pub mod db;
pub mod editor;
pub mod logging;
pub mod markdown;
pub mod model;
pub mod repo;
pub mod service;
pub mod speech;
pub mod store;

pub use editor::{
    ApplyMode, Block, BlockDocument, BlockId, BlockView, EditorConfig, EditorError,
    EditorSession, KeyCommand, KeyOutcome,
};
pub use logging::{active_logging, init_logging, LogLevel, LoggingConfig, LoggingError};
pub use model::folder::{Folder, FolderId};
pub use model::page::{Page, PageId, VoiceMemo};
pub use model::settings::{AiProviderKind, Settings};
pub use repo::{RepoError, RepoResult};
pub use store::{KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Health-check probe for shells embedding the core.
pub fn ping() -> &'static str {
    "pong"
}

pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
