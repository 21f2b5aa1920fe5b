//! Markdown rendering and `[[wiki link]]` handling.
//!
//! # Responsibility
//! - Render block markdown to HTML through comrak.
//! - Parse, resolve and rewrite `[[Page Title]]` links.
//!
//! # Invariants
//! - Raw HTML in user content is never passed through to rendered output.
//! - Link targets compare case-insensitively.

pub mod render;
pub mod wikilink;

pub use render::{ComrakRenderer, MarkdownRenderer};
pub use wikilink::{
    decorate_wiki_links, extract_wiki_links, replace_wiki_links, LinkResolver, MISSING_PAGE_HREF,
    PAGE_HREF,
};
