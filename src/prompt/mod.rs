//! Prompt assembly: turns stored profile data and a content idea into the
//! single text prompt sent to the generation model.
//!
//! Pipeline:
//! - [`assembler::PromptAssembler::assemble_base`] builds the idea-independent
//!   base prompt and memoises it in [`cache::PromptCache`].
//! - [`assembler::PromptAssembler::assemble_final`] extends the base prompt
//!   with examples, notes directives, selected stories, the idea itself and
//!   the task instruction, which always comes last.
//!
//! Every block of text is a [`PromptSection`]; [`PromptStructure`] fixes the
//! order they are rendered in.

pub mod assembler;
pub mod cache;
pub mod catalog;
pub mod notes;
pub mod sections;
pub mod stories;

use serde::Serialize;

/// Approximate characters per token, same heuristic used for budget logging.
const CHARS_PER_TOKEN: u64 = 4;

/// Separator between rendered sections.
const SECTION_SEPARATOR: &str = "\n\n";

/// One titled block of prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptSection {
    /// Section heading, rendered on its own line.
    pub title: String,
    /// Section body.
    pub content: String,
}

impl PromptSection {
    /// Create a section.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Returns `true` if the body is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Render as `title\ncontent`. A blank title renders the content alone.
    pub fn render(&self) -> String {
        if self.title.is_empty() {
            self.content.clone()
        } else {
            format!("{}\n{}", self.title, self.content)
        }
    }
}

/// Ordered list of sections.
///
/// Push order is the render order; nothing reorders sections afterwards.
/// Changing the order in which assemblers push sections changes model output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptStructure {
    sections: Vec<PromptSection>,
}

impl PromptStructure {
    /// Create an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one section.
    pub fn push(&mut self, section: PromptSection) {
        self.sections.push(section);
    }

    /// Append a section only if present.
    pub fn push_opt(&mut self, section: Option<PromptSection>) {
        if let Some(section) = section {
            self.sections.push(section);
        }
    }

    /// Append several sections in order.
    pub fn extend(&mut self, sections: impl IntoIterator<Item = PromptSection>) {
        self.sections.extend(sections);
    }

    /// Sections in render order.
    pub fn sections(&self) -> &[PromptSection] {
        &self.sections
    }

    /// Render non-blank sections separated by a blank line.
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .filter(|s| !s.is_blank())
            .map(PromptSection::render)
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
    }
}

/// Append rendered sections to an already rendered prompt.
pub fn append_rendered(prompt: &str, tail: &PromptStructure) -> String {
    let rendered = tail.render();
    if prompt.is_empty() {
        return rendered;
    }
    if rendered.is_empty() {
        return prompt.to_owned();
    }
    format!("{prompt}{SECTION_SEPARATOR}{rendered}")
}

/// Estimate the token count of a prompt using the 4-chars-per-token heuristic.
pub fn estimate_tokens(prompt: &str) -> u64 {
    let char_count = u64::try_from(prompt.chars().count()).unwrap_or(u64::MAX);
    char_count
        .saturating_add(CHARS_PER_TOKEN.saturating_sub(1))
        .checked_div(CHARS_PER_TOKEN)
        .unwrap_or(0)
}
