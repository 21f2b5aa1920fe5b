//! Block document model.
//!
//! # Responsibility
//! - Own the ordered blocks of one page body plus edit focus and selection.
//! - Convert between the flat page `content` string and blocks.
//!
//! # Invariants
//! - The block sequence is never empty.
//! - Every block has a `BlockId` that is never reused within a document, so
//!   edit focus and selection follow their block across renumbering.
//! - No operation panics or errors; out-of-range indices are no-ops.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::ops::Range;

/// Separator between serialized blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Stable per-document block handle, independent of display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(u64);

impl Display for BlockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// One markdown segment of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    content: String,
}

impl Block {
    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered blocks of one page with edit and selection state.
#[derive(Debug, Clone)]
pub struct BlockDocument {
    blocks: Vec<Block>,
    next_id: u64,
    editing: Option<BlockId>,
    selected: BTreeSet<BlockId>,
}

impl Default for BlockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockDocument {
    /// Creates a document holding one empty block.
    pub fn new() -> Self {
        Self::from_contents(std::iter::empty::<String>())
    }

    /// Builds a document from raw block contents. Empty input yields one
    /// empty block.
    pub fn from_contents<I, T>(contents: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut document = Self {
            blocks: Vec::new(),
            next_id: 0,
            editing: None,
            selected: BTreeSet::new(),
        };
        for content in contents {
            let block = document.make_block(content.into());
            document.blocks.push(block);
        }
        document.ensure_not_empty();
        document
    }

    /// Splits page content into blocks.
    ///
    /// Blank lines separate blocks. Each group of lines is trimmed; a group
    /// that trims to nothing is dropped unless it closes the input, so a
    /// trailing blank-line run still yields a final empty block.
    pub fn deserialize(text: &str) -> Self {
        let lines: Vec<&str> = text.split('\n').collect();
        let last_index = lines.len() - 1;
        let mut contents = Vec::new();
        let mut group: Vec<&str> = Vec::new();

        for (index, line) in lines.into_iter().enumerate() {
            let is_last = index == last_index;
            if !line.is_empty() {
                group.push(line);
            }
            if line.is_empty() || is_last {
                let joined = group.join("\n");
                let trimmed = joined.trim();
                if !trimmed.is_empty() || is_last {
                    contents.push(trimmed.to_string());
                }
                group.clear();
            }
        }

        Self::from_contents(contents)
    }

    /// Joins block contents with a blank line.
    pub fn serialize(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.content.as_str())
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Never true while the non-empty invariant holds.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn content(&self, index: usize) -> Option<&str> {
        self.blocks.get(index).map(Block::content)
    }

    pub fn contents(&self) -> Vec<&str> {
        self.blocks.iter().map(Block::content).collect()
    }

    /// Current display index of a block handle.
    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    /// Index of the block in edit mode, if any.
    pub fn edit_index(&self) -> Option<usize> {
        self.editing.and_then(|id| self.index_of(id))
    }

    pub fn is_editing(&self, index: usize) -> bool {
        self.edit_index() == Some(index)
    }

    /// Puts the block at `index` in edit mode. Returns `false` when out of range.
    pub fn begin_edit(&mut self, index: usize) -> bool {
        match self.blocks.get(index) {
            Some(block) => {
                self.editing = Some(block.id);
                true
            }
            None => false,
        }
    }

    /// Leaves edit mode. Returns the index that was being edited.
    pub fn end_edit(&mut self) -> Option<usize> {
        let index = self.edit_index();
        self.editing = None;
        index
    }

    /// Replaces the content of one block.
    pub fn set_content(&mut self, index: usize, content: impl Into<String>) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) => {
                block.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Appends text to one block.
    pub fn append_to(&mut self, index: usize, text: &str) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) => {
                block.content.push_str(text);
                true
            }
            None => false,
        }
    }

    /// Truncates the block at `cursor` (a character offset, clamped) and
    /// returns the removed tail.
    pub fn split_off(&mut self, index: usize, cursor: usize) -> Option<String> {
        let block = self.blocks.get_mut(index)?;
        let byte_offset = char_to_byte_offset(&block.content, cursor);
        Some(block.content.split_off(byte_offset))
    }

    /// Inserts a block at `at` (clamped to the end) and returns its index.
    pub fn insert_block(&mut self, at: usize, content: impl Into<String>) -> usize {
        let at = at.min(self.blocks.len());
        let block = self.make_block(content.into());
        self.blocks.insert(at, block);
        at
    }

    /// Parses `text` into blocks and inserts them at `at` (clamped to the
    /// end). Returns the index range now holding the new blocks.
    pub fn insert_parsed(&mut self, at: usize, text: &str) -> Range<usize> {
        let at = at.min(self.blocks.len());
        let parsed = Self::deserialize(text);
        let count = parsed.blocks.len();
        for (offset, block) in parsed.blocks.into_iter().enumerate() {
            let block = self.make_block(block.content);
            self.blocks.insert(at + offset, block);
        }
        at..at + count
    }

    /// Removes the block at `index`; the last remaining block is cleared
    /// instead of removed. Returns `false` when out of range.
    pub fn delete_block(&mut self, index: usize) -> bool {
        if index >= self.blocks.len() {
            return false;
        }
        if self.blocks.len() == 1 {
            self.blocks[0].content.clear();
            return true;
        }
        let removed = self.blocks.remove(index);
        self.forget(removed.id);
        true
    }

    /// Marks or unmarks one block for bulk operations.
    pub fn toggle_selection(&mut self, index: usize, selected: bool) -> bool {
        let Some(id) = self.blocks.get(index).map(Block::id) else {
            return false;
        };
        if selected {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
        true
    }

    /// Selected block indices in ascending order.
    pub fn selected_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .selected
            .iter()
            .filter_map(|id| self.index_of(*id))
            .collect();
        indices.sort_unstable();
        indices
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Removes every selected block, highest index first, then clears the
    /// selection. Returns how many blocks were removed or cleared.
    pub fn delete_selected(&mut self) -> usize {
        let mut affected = 0;
        for index in self.selected_indices().into_iter().rev() {
            if self.delete_block(index) {
                affected += 1;
            }
        }
        self.selected.clear();
        affected
    }

    /// Replaces every block with the blocks parsed from `text`.
    pub fn replace_all(&mut self, text: &str) {
        let parsed = Self::deserialize(text);
        self.blocks.clear();
        self.editing = None;
        self.selected.clear();
        for block in parsed.blocks {
            let block = self.make_block(block.content);
            self.blocks.push(block);
        }
        self.ensure_not_empty();
    }

    /// Concatenated content of the selected blocks, in display order.
    pub fn selected_text(&self) -> String {
        self.selected_indices()
            .into_iter()
            .filter_map(|index| self.content(index))
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }

    fn make_block(&mut self, content: String) -> Block {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        Block { id, content }
    }

    fn forget(&mut self, id: BlockId) {
        self.selected.remove(&id);
        if self.editing == Some(id) {
            self.editing = None;
        }
    }

    fn ensure_not_empty(&mut self) {
        if self.blocks.is_empty() {
            let block = self.make_block(String::new());
            self.blocks.push(block);
        }
    }
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn char_to_byte_offset(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map_or(text.len(), |(offset, _)| offset)
}
