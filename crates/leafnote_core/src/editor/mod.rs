//! Block editor.
//!
//! # Responsibility
//! - `document`: block sequence, edit focus and selection state.
//! - `protocol`: key commands to block operations.
//! - `debounce`: quiet-period timer for typed changes.
//! - `session`: one open page wired to storage and link resolution.
//!
//! # Invariants
//! - A document always holds at least one block.
//! - Only the block in edit mode reacts to key commands.

pub mod debounce;
pub mod document;
pub mod protocol;
pub mod session;

pub use debounce::{Clock, Debouncer, ManualClock, SystemClock, DEFAULT_DEBOUNCE};
pub use document::{Block, BlockDocument, BlockId, BLOCK_SEPARATOR};
pub use protocol::{classify, KeyCommand, KeyOutcome};
pub use session::{ApplyMode, BlockView, EditorConfig, EditorError, EditorSession};
