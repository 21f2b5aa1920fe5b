//! Prompt templates for editor transforms.

/// What to do with the selected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformAction {
    Summarize,
    ImproveWriting,
    FixGrammar,
    MakeShorter,
    ContinueWriting,
    /// Free-form instruction typed by the user.
    Custom(String),
}

impl TransformAction {
    /// Short name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::ImproveWriting => "improve_writing",
            Self::FixGrammar => "fix_grammar",
            Self::MakeShorter => "make_shorter",
            Self::ContinueWriting => "continue_writing",
            Self::Custom(_) => "custom",
        }
    }

    fn instruction(&self) -> &str {
        match self {
            Self::Summarize => "Summarize the following notes in a few concise bullet points.",
            Self::ImproveWriting => {
                "Rewrite the following text to be clearer and better structured. Keep its meaning."
            }
            Self::FixGrammar => {
                "Fix spelling and grammar in the following text. Change nothing else."
            }
            Self::MakeShorter => "Shorten the following text while keeping the key points.",
            Self::ContinueWriting => {
                "Continue writing the following text in the same voice. Return only the continuation."
            }
            Self::Custom(instruction) => instruction.trim(),
        }
    }

    /// Full prompt for `text`. Markdown in, markdown out.
    pub fn build_prompt(&self, text: &str) -> String {
        format!(
            "{}\nRespond with markdown only, without commentary.\n\n{}",
            self.instruction(),
            text.trim()
        )
    }
}
