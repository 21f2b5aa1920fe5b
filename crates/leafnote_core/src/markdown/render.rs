//! Markdown → HTML rendering.

use comrak::{markdown_to_html, Options};

/// Pure markdown-to-HTML function.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// GitHub-flavored markdown renderer backed by comrak.
pub struct ComrakRenderer {
    options: Options<'static>,
}

impl ComrakRenderer {
    pub fn new() -> Self {
        let mut options = Options::default();
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.tasklist = true;
        options.extension.autolink = true;
        options.render.unsafe_ = false;
        Self { options }
    }
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> String {
        markdown_to_html(markdown, &self.options)
    }
}
