//! `[[wiki link]]` parsing, resolution and rewriting.

use crate::model::page::PageId;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

static WIKI_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]\n]+)\]\]").expect("valid wiki link regex"));

/// Href prefix for links to existing pages.
pub const PAGE_HREF: &str = "#/page/";
/// Href prefix for links to pages that do not exist yet.
pub const MISSING_PAGE_HREF: &str = "#/new-page/";

/// Maps a page title to a page id.
pub trait LinkResolver {
    fn resolve(&self, title: &str) -> Option<PageId>;
}

impl<L: LinkResolver + ?Sized> LinkResolver for &L {
    fn resolve(&self, title: &str) -> Option<PageId> {
        (**self).resolve(title)
    }
}

/// Returns link targets in first-seen order, deduplicated case-insensitively.
pub fn extract_wiki_links(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    WIKI_LINK_RE
        .captures_iter(text)
        .filter_map(|caps| link_target(&caps))
        .filter(|title| seen.insert(title.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Rewrites every `[[Title]]` into a markdown link: resolved titles point at
/// the page, unresolved ones at the page-creation route.
pub fn decorate_wiki_links(text: &str, resolver: &impl LinkResolver) -> String {
    WIKI_LINK_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let Some(title) = link_target(caps) else {
                return caps[0].to_string();
            };
            match resolver.resolve(title) {
                Some(page_id) => format!("[{title}]({PAGE_HREF}{page_id})"),
                None => format!("[{title}]({MISSING_PAGE_HREF}{})", encode_title(title)),
            }
        })
        .into_owned()
}

/// Retargets links pointing at `from` (case-insensitive) to `to`.
pub fn replace_wiki_links(text: &str, from: &str, to: &str) -> String {
    let from = from.trim();
    let to = to.trim();
    WIKI_LINK_RE
        .replace_all(text, |caps: &Captures<'_>| match link_target(caps) {
            Some(title) if title.to_lowercase() == from.to_lowercase() => format!("[[{to}]]"),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Whether `text` contains a link to `title` (case-insensitive).
pub fn links_to(text: &str, title: &str) -> bool {
    let wanted = title.trim().to_lowercase();
    !wanted.is_empty()
        && WIKI_LINK_RE
            .captures_iter(text)
            .filter_map(|caps| link_target(&caps))
            .any(|target| target.to_lowercase() == wanted)
}

fn link_target<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.get(1)
        .map(|m| m.as_str().trim())
        .filter(|title| !title.is_empty())
}

fn encode_title(title: &str) -> String {
    url::form_urlencoded::byte_serialize(title.as_bytes()).collect()
}
