//! Section builders: pure functions rendering one slice of context each.
//!
//! Builders never fail. Missing input degrades in one of two ways, and the
//! difference is deliberate because downstream prompt tuning relies on the
//! exact text:
//! - **placeholder**: business context, pillars, audiences and writing style
//!   always render, with fixed placeholder text when data is missing;
//! - **omission**: documents, examples, stories, patterns to avoid and
//!   custom instructions return `None` when there is nothing to say.

use std::fmt::Write as _;

use super::catalog;
use super::PromptSection;
use crate::profile::{
    BusinessDocument, ContentGoal, ContentIdea, ContentPillar, ContentType, PersonalStory,
    TargetAudience, UserProfile, WritingStyleProfile,
};

/// Placeholder for absent business context.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Placeholder bullet for a user with no pillars.
pub const NO_PILLARS: &str = "- No content pillars defined";

/// Placeholder bullet for a user with no audiences.
pub const NO_AUDIENCES: &str = "- No target audiences defined";

/// Placeholder body when no writing style profile exists.
pub const NO_STYLE_PROFILE: &str = "No writing style profile available. \
Write in a clear, conversational and professional voice.";

/// Title of the task section.
pub const TASK_TITLE: &str = "## Task";

/// Title of the regeneration section.
pub const REGENERATION_TITLE: &str = "## Regeneration Instructions";

/// Title of the content idea section.
pub const CONTENT_IDEA_TITLE: &str = "## Content Idea";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Opening line naming who the content is for and what kind it is.
pub fn intro_section(profile: Option<&UserProfile>, content_type: &ContentType) -> PromptSection {
    let name = profile.and_then(|p| non_blank(p.name.as_deref()));
    let business = profile.and_then(|p| non_blank(p.business_name.as_deref()));
    let deliverable = content_type.deliverable();

    let subject = match (name, business) {
        (Some(n), Some(b)) => format!("{n} of {b}"),
        (Some(n), None) => n.to_owned(),
        (None, Some(b)) => b.to_owned(),
        (None, None) => "this user".to_owned(),
    };

    PromptSection::new(
        "",
        format!(
            "You are an expert content writer creating {deliverable} for {subject}. \
             Use the context below to write in their voice for their audience."
        ),
    )
}

/// Business description and job title.
pub fn business_context_section(profile: Option<&UserProfile>) -> PromptSection {
    let description = profile.and_then(|p| non_blank(p.business_description.as_deref()));
    let Some(description) = description else {
        return PromptSection::new("## Business Context", NOT_SPECIFIED);
    };

    let mut body = description.to_owned();
    if let Some(title) = profile.and_then(|p| non_blank(p.job_title.as_deref())) {
        let _ = write!(body, "\nJob title: {title}");
    }
    PromptSection::new("## Business Context", body)
}

/// One bullet per pillar, in input order.
pub fn content_pillars_section(pillars: &[ContentPillar]) -> PromptSection {
    if pillars.is_empty() {
        return PromptSection::new("## Content Pillars", NO_PILLARS);
    }
    let body = pillars
        .iter()
        .map(|p| format!("- {}: {}", p.name, p.description))
        .collect::<Vec<_>>()
        .join("\n");
    PromptSection::new("## Content Pillars", body)
}

/// One bullet per audience with nested pain points and goals.
pub fn target_audiences_section(audiences: &[TargetAudience]) -> PromptSection {
    if audiences.is_empty() {
        return PromptSection::new("## Target Audiences", NO_AUDIENCES);
    }
    let mut body = String::new();
    for (i, audience) in audiences.iter().enumerate() {
        if i > 0 {
            body.push('\n');
        }
        let _ = write!(body, "- {}: {}", audience.name, audience.description);
        if !audience.pain_points.is_empty() {
            let _ = write!(body, "\n  Pain points: {}", audience.pain_points.join(", "));
        }
        if !audience.goals.is_empty() {
            let _ = write!(body, "\n  Goals: {}", audience.goals.join(", "));
        }
    }
    PromptSection::new("## Target Audiences", body)
}

/// Voice, general guide, content-type guide and vocabulary, in that order.
///
/// Returns a single placeholder section when there is no profile at all.
pub fn writing_style_sections(
    style: Option<&WritingStyleProfile>,
    content_type: &ContentType,
) -> Vec<PromptSection> {
    let Some(style) = style else {
        return vec![PromptSection::new("## Writing Style", NO_STYLE_PROFILE)];
    };

    let or_placeholder = |value: Option<&str>, what: &str| -> String {
        non_blank(value).map_or_else(|| format!("No {what} available"), str::to_owned)
    };

    let label = content_type.label();
    vec![
        PromptSection::new(
            "## Voice Analysis",
            or_placeholder(style.voice_analysis.as_deref(), "voice analysis"),
        ),
        PromptSection::new(
            "## General Style Guide",
            or_placeholder(style.general_style_guide.as_deref(), "general style guide"),
        ),
        PromptSection::new(
            format!("## {label} Style Guide"),
            or_placeholder(
                style.style_guide_for(content_type),
                &format!("{label} style guide"),
            ),
        ),
        PromptSection::new(
            "## Vocabulary Patterns to Use",
            or_placeholder(style.vocabulary_patterns.as_deref(), "vocabulary patterns"),
        ),
    ]
}

/// Business-context documents, or `None` when there are none.
pub fn business_documents_section(documents: &[BusinessDocument]) -> Option<PromptSection> {
    let docs: Vec<_> = documents
        .iter()
        .filter(|d| !d.content.trim().is_empty())
        .collect();
    if docs.is_empty() {
        return None;
    }
    let body = docs
        .iter()
        .map(|d| format!("### {}\n{}", d.title, d.content.trim()))
        .collect::<Vec<_>>()
        .join("\n\n");
    Some(PromptSection::new("## Business Context Documents", body))
}

/// Static platform best practices. Blank (and dropped at render) for unknown types.
pub fn best_practices_section(content_type: &ContentType) -> PromptSection {
    PromptSection::new(
        format!("## {} Best Practices", content_type.label()),
        catalog::best_practices(content_type),
    )
}

/// Static length and structure guidelines. Blank for unknown types.
pub fn content_guidelines_section(content_type: &ContentType) -> PromptSection {
    PromptSection::new(
        "## Content Guidelines",
        catalog::content_guidelines(content_type),
    )
}

/// Truncate to at most `max_chars` characters, marking the cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_owned(),
    }
}

/// Prior examples of the user's content, or `None` when there are none.
pub fn examples_section(
    content_type: &ContentType,
    examples: &[String],
    max_chars: usize,
) -> Option<PromptSection> {
    let examples: Vec<&str> = examples
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .collect();
    if examples.is_empty() {
        return None;
    }
    let mut body = String::from(
        "Match the tone, structure and length of these examples without copying them.",
    );
    for (i, example) in examples.iter().enumerate() {
        let _ = write!(
            body,
            "\n\nExample {}:\n{}",
            i.saturating_add(1),
            truncate_chars(example, max_chars)
        );
    }
    Some(PromptSection::new(
        format!("## Examples of Previous {} Content", content_type.label()),
        body,
    ))
}

/// Selected personal stories, or `None` when none were selected.
pub fn personal_stories_section(stories: &[PersonalStory]) -> Option<PromptSection> {
    if stories.is_empty() {
        return None;
    }
    let mut body = String::from(
        "Weave in one of these stories where it fits naturally. Do not force it.",
    );
    for story in stories {
        let _ = write!(body, "\n\n### {}\n{}", story.title, story.content.trim());
        if let Some(guidance) = non_blank(story.usage_guidance.as_deref()) {
            let _ = write!(body, "\nUsage guidance: {guidance}");
        }
    }
    Some(PromptSection::new("## Personal Stories", body))
}

/// The style profile's patterns to avoid, or `None`.
pub fn patterns_to_avoid_section(style: Option<&WritingStyleProfile>) -> Option<PromptSection> {
    let patterns = style.and_then(|s| non_blank(s.avoid_patterns.as_deref()))?;
    Some(PromptSection::new("## Patterns to Avoid", patterns))
}

/// Guidance for a content goal. Unrecognised goals get the goal line only.
pub fn content_goal_section(goal: &ContentGoal) -> PromptSection {
    let mut body = format!("Goal: {}", goal.as_str());
    if let Some(guidance) = catalog::goal_guidance(goal) {
        let _ = write!(body, "\n{guidance}");
    }
    PromptSection::new("## Content Goal", body)
}

/// Instruction to integrate a call to action.
pub fn call_to_action_section(cta: &str) -> PromptSection {
    PromptSection::new(
        "## Call to Action",
        format!(
            "Integrate this call to action naturally, ideally near the end: \"{}\"",
            cta.trim()
        ),
    )
}

/// Title, description and raw notes of the idea being written.
pub fn content_idea_section(idea: &ContentIdea) -> PromptSection {
    let mut body = format!("Title: {}", idea.title.trim());
    if let Some(description) = non_blank(idea.description.as_deref()) {
        let _ = write!(body, "\nDescription: {description}");
    }
    if let Some(notes) = non_blank(idea.notes.as_deref()) {
        let _ = write!(body, "\nNotes:\n{notes}");
    }
    PromptSection::new(CONTENT_IDEA_TITLE, body)
}

/// The user's custom instructions, or `None` when none are configured.
pub fn custom_instructions_section(instructions: Option<&str>) -> Option<PromptSection> {
    let instructions = non_blank(instructions)?;
    Some(PromptSection::new("## Custom Instructions", instructions))
}

/// Changes requested for a regeneration.
pub fn regeneration_section(instructions: &str) -> Option<PromptSection> {
    let instructions = non_blank(Some(instructions))?;
    Some(PromptSection::new(
        REGENERATION_TITLE,
        format!(
            "This is a regeneration of earlier content. Apply these changes: {instructions}"
        ),
    ))
}

/// Final instruction. Always the last section of a final prompt.
pub fn task_section(content_type: &ContentType) -> PromptSection {
    PromptSection::new(TASK_TITLE, catalog::task_instruction(content_type))
}
