//! Keyboard editing protocol.
//!
//! Translates navigation/structure keys into block operations without
//! touching state; `EditorSession::handle_key` executes the outcome.
//! Plain character input is not a `KeyCommand`: it reaches the session as
//! `update_content`.

use super::document::{char_len, BlockDocument};

/// Structural keys understood by the block editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Enter { shift: bool },
    Backspace,
    ArrowUp,
    ArrowDown,
    Escape,
}

/// State change produced by one key command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Key is not handled; the text input keeps its default behavior.
    Ignored,
    /// Block was cut at the cursor; the tail moved to a new block being edited.
    Split { index: usize, new_index: usize },
    /// An empty block was added below and is now being edited.
    NewBlockBelow { index: usize, new_index: usize },
    /// The empty block was removed and focus moved to the previous block.
    RemovedEmpty { removed: usize, focus: usize },
    /// Edit focus moved to a neighbouring block.
    FocusMoved { from: usize, to: usize },
    /// Edit mode was left.
    Exited { index: usize },
}

/// Decides what `command` does to the block at `index` with the caret at
/// character offset `cursor`.
///
/// Only the block currently in edit mode reacts to keys.
pub fn classify(
    document: &BlockDocument,
    command: KeyCommand,
    index: usize,
    cursor: usize,
) -> KeyOutcome {
    if document.edit_index() != Some(index) {
        return KeyOutcome::Ignored;
    }
    let Some(content) = document.content(index) else {
        return KeyOutcome::Ignored;
    };
    let length = char_len(content);
    let at_end = cursor >= length;

    match command {
        KeyCommand::Enter { shift: true } => KeyOutcome::Ignored,
        KeyCommand::Enter { shift: false } if at_end => KeyOutcome::NewBlockBelow {
            index,
            new_index: index + 1,
        },
        KeyCommand::Enter { shift: false } => KeyOutcome::Split {
            index,
            new_index: index + 1,
        },
        KeyCommand::Backspace if content.is_empty() && index > 0 => KeyOutcome::RemovedEmpty {
            removed: index,
            focus: index - 1,
        },
        KeyCommand::ArrowUp if cursor == 0 && index > 0 => KeyOutcome::FocusMoved {
            from: index,
            to: index - 1,
        },
        KeyCommand::ArrowDown if at_end && index + 1 < document.len() => {
            KeyOutcome::FocusMoved {
                from: index,
                to: index + 1,
            }
        }
        KeyCommand::Escape => KeyOutcome::Exited { index },
        _ => KeyOutcome::Ignored,
    }
}
