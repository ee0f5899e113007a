//! Extraction of machine-readable directives from an idea's free-text notes.
//!
//! Notes may carry two lines the idea form writes for the user:
//!
//! ```text
//! Content Goal: lead_generation
//! Call to Action: Book a demo
//! ```
//!
//! Prefixes match case-insensitively at the start of a line (leading
//! whitespace allowed). The first matching line wins and the value runs to
//! the end of that line. Missing or empty values yield `None`.

use std::sync::LazyLock;

use regex::Regex;

use crate::profile::ContentGoal;

/// Directives parsed from idea notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaDirectives {
    /// Parsed `Content Goal:` value.
    pub goal: Option<ContentGoal>,
    /// Raw `Call to Action:` value, trimmed.
    pub call_to_action: Option<String>,
}

/// Matches `Content Goal: <value>` at the start of any line.
static GOAL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*content goal:[ \t]*(.*)$").ok());

/// Matches `Call to Action: <value>` at the start of any line.
static CTA_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*call to action:[ \t]*(.*)$").ok());

/// First non-empty capture of `pattern` in `notes`, trimmed.
fn first_value(pattern: Option<&Regex>, notes: &str) -> Option<String> {
    let caps = pattern?.captures(notes)?;
    let value = caps.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// Parse the goal line from notes.
pub fn parse_content_goal(notes: &str) -> Option<ContentGoal> {
    first_value(GOAL_PATTERN.as_ref(), notes).map(|raw| ContentGoal::parse(&raw))
}

/// Parse the call-to-action line from notes.
pub fn parse_call_to_action(notes: &str) -> Option<String> {
    first_value(CTA_PATTERN.as_ref(), notes)
}

/// Parse both directives. Absent notes yield empty directives.
pub fn parse_idea_notes(notes: Option<&str>) -> IdeaDirectives {
    let Some(notes) = notes else {
        return IdeaDirectives::default();
    };
    IdeaDirectives {
        goal: parse_content_goal(notes),
        call_to_action: parse_call_to_action(notes),
    }
}
