//! Profile data consumed by prompt assembly.
//!
//! Everything in this module is a read-only snapshot owned by the persistence
//! layer. Prompt assembly never mutates these values; it only renders them.

pub mod fixture;
pub mod source;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Content type
// ---------------------------------------------------------------------------

/// Which kind of content is being generated.
///
/// Selects the style guide, best-practice block, guideline block, example
/// set and task instruction. Unknown names are kept as [`ContentType::Other`]
/// and render with general guidance only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// A LinkedIn post.
    Linkedin,
    /// An email newsletter.
    Newsletter,
    /// Marketing copy (landing pages, ads, emails).
    Marketing,
    /// Any content type outside the known set, stored lowercased.
    Other(String),
}

impl ContentType {
    /// Parse a content type name. Matching is case-insensitive and never fails.
    pub fn parse(s: &str) -> Self {
        let normalised = s.trim().to_lowercase();
        match normalised.as_str() {
            "linkedin" => Self::Linkedin,
            "newsletter" => Self::Newsletter,
            "marketing" => Self::Marketing,
            _ => Self::Other(normalised),
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Newsletter => "newsletter",
            Self::Marketing => "marketing",
            Self::Other(name) => name,
        }
    }

    /// Human-readable label used in section titles.
    pub fn label(&self) -> &str {
        match self {
            Self::Linkedin => "LinkedIn",
            Self::Newsletter => "Newsletter",
            Self::Marketing => "Marketing",
            Self::Other(name) => name,
        }
    }

    /// Plural phrasing used in the intro line ("LinkedIn posts").
    pub fn deliverable(&self) -> String {
        match self {
            Self::Linkedin => "LinkedIn posts".to_owned(),
            Self::Newsletter => "email newsletters".to_owned(),
            Self::Marketing => "marketing copy".to_owned(),
            Self::Other(name) => format!("{name} content"),
        }
    }

    /// Returns `true` for linkedin, newsletter and marketing.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

// ---------------------------------------------------------------------------
// Content goal
// ---------------------------------------------------------------------------

/// Strategic goal embedded in an idea's notes as `Content Goal: <value>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentGoal {
    /// Grow reach and followers.
    AudienceBuilding,
    /// Capture leads.
    LeadGeneration,
    /// Build trust with an existing audience.
    Nurturing,
    /// Drive a purchase or sign-up.
    Conversion,
    /// Keep existing customers engaged.
    Retention,
    /// Unrecognised goal, kept verbatim (trimmed).
    Other(String),
}

impl ContentGoal {
    /// Parse a goal value into its canonical form.
    ///
    /// Canonicalisation lowercases and maps spaces and hyphens to `_`, so
    /// "Lead Generation" and "lead-generation" both resolve to
    /// [`ContentGoal::LeadGeneration`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let canonical: String = trimmed
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match canonical.as_str() {
            "audience_building" => Self::AudienceBuilding,
            "lead_generation" => Self::LeadGeneration,
            "nurturing" => Self::Nurturing,
            "conversion" => Self::Conversion,
            "retention" => Self::Retention,
            _ => Self::Other(trimmed.to_owned()),
        }
    }

    /// Canonical name (`lead_generation`), or the raw value for unknown goals.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AudienceBuilding => "audience_building",
            Self::LeadGeneration => "lead_generation",
            Self::Nurturing => "nurturing",
            Self::Conversion => "conversion",
            Self::Retention => "retention",
            Self::Other(raw) => raw,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The user's own profile and business identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Business or brand name.
    #[serde(default)]
    pub business_name: Option<String>,
    /// Free-text business description.
    #[serde(default)]
    pub business_description: Option<String>,
    /// Job title.
    #[serde(default)]
    pub job_title: Option<String>,
    /// LinkedIn profile URL.
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

/// A recurring topic the user's content strategy is built around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPillar {
    /// Pillar id.
    pub id: String,
    /// Short name.
    pub name: String,
    /// What the pillar covers.
    #[serde(default)]
    pub description: String,
}

/// An audience segment the content is written for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAudience {
    /// Audience id.
    pub id: String,
    /// Segment name.
    pub name: String,
    /// Who the segment is.
    #[serde(default)]
    pub description: String,
    /// Pain points, in display order.
    #[serde(default)]
    pub pain_points: Vec<String>,
    /// Goals, in display order.
    #[serde(default)]
    pub goals: Vec<String>,
}

/// Per-user writing style analysis and guides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritingStyleProfile {
    /// Analysis of the user's voice.
    pub voice_analysis: Option<String>,
    /// Style guide applying to every content type.
    pub general_style_guide: Option<String>,
    /// LinkedIn-specific style guide.
    pub linkedin_style_guide: Option<String>,
    /// Newsletter-specific style guide.
    pub newsletter_style_guide: Option<String>,
    /// Marketing-specific style guide.
    pub marketing_style_guide: Option<String>,
    /// Vocabulary and phrasing patterns to use.
    pub vocabulary_patterns: Option<String>,
    /// Patterns the model must avoid.
    pub avoid_patterns: Option<String>,
    /// Free-form instructions appended to every prompt.
    pub custom_instructions: Option<String>,
    /// Example LinkedIn posts captured with the style analysis.
    pub linkedin_examples: Vec<String>,
    /// Example newsletters captured with the style analysis.
    pub newsletter_examples: Vec<String>,
    /// Example marketing copy captured with the style analysis.
    pub marketing_examples: Vec<String>,
}

impl WritingStyleProfile {
    /// Style guide for a content type, if the type has one.
    pub fn style_guide_for(&self, content_type: &ContentType) -> Option<&str> {
        let guide = match content_type {
            ContentType::Linkedin => self.linkedin_style_guide.as_deref(),
            ContentType::Newsletter => self.newsletter_style_guide.as_deref(),
            ContentType::Marketing => self.marketing_style_guide.as_deref(),
            ContentType::Other(_) => None,
        };
        guide.filter(|g| !g.trim().is_empty())
    }
}

/// An idea the user wants turned into content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentIdea {
    /// Idea id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Free-text notes. May embed `Content Goal:` and `Call to Action:` lines.
    #[serde(default)]
    pub notes: Option<String>,
    /// Content type the idea was created for.
    pub content_type: ContentType,
    /// Associated content pillar.
    #[serde(default)]
    pub content_pillar_id: Option<String>,
    /// Associated target audience.
    #[serde(default)]
    pub target_audience_id: Option<String>,
    /// Set only for a "regenerate with changes" request.
    #[serde(default)]
    pub regeneration_instructions: Option<String>,
}

/// A reusable anecdote that can be woven into generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalStory {
    /// Story id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Story body.
    pub content: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Pillars this story supports.
    #[serde(default)]
    pub content_pillar_ids: Vec<String>,
    /// Audiences this story resonates with.
    #[serde(default)]
    pub target_audience_ids: Vec<String>,
    /// Free-text guidance on when to use the story.
    #[serde(default)]
    pub usage_guidance: Option<String>,
    /// How many times the story has been used.
    #[serde(default)]
    pub usage_count: u32,
    /// When the story was last used.
    #[serde(default)]
    pub last_used_date: Option<DateTime<Utc>>,
    /// Archived stories are never selected.
    #[serde(default)]
    pub is_archived: bool,
}

/// A stored text document (business context, newsletter or marketing example).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDocument {
    /// Document id.
    pub id: String,
    /// Title or file name.
    pub title: String,
    /// Extracted text content.
    pub content: String,
}

/// A previously published LinkedIn post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedinPost {
    /// Post id.
    pub id: String,
    /// Post text.
    pub content: String,
    /// Publication time, newest first when fetched.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}
