//! TOML fixture files describing one or more users' stored data.
//!
//! Used by the preview CLI to render prompts without a database:
//!
//! ```toml
//! [[users]]
//! id = "user-1"
//! custom_instructions = "Always write in British English."
//!
//! [users.profile]
//! id = "user-1"
//! name = "Ada"
//! business_name = "Lovelace Analytics"
//!
//! [[users.pillars]]
//! id = "p1"
//! name = "Data strategy"
//! description = "Turning data into decisions"
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use super::source::{InMemoryProfileSource, UserData};
use super::{
    BusinessDocument, ContentIdea, ContentPillar, LinkedinPost, PersonalStory, TargetAudience,
    UserProfile, WritingStyleProfile,
};

/// Top-level fixture document.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileFixture {
    /// Users described by the fixture.
    #[serde(default)]
    pub users: Vec<UserFixture>,
}

/// One user's data in a fixture file.
#[derive(Debug, Deserialize)]
pub struct UserFixture {
    /// User id.
    pub id: String,
    /// Profile.
    #[serde(default)]
    pub profile: Option<UserProfile>,
    /// Content pillars.
    #[serde(default)]
    pub pillars: Vec<ContentPillar>,
    /// Target audiences.
    #[serde(default)]
    pub audiences: Vec<TargetAudience>,
    /// Writing style profile.
    #[serde(default)]
    pub style: Option<WritingStyleProfile>,
    /// Business-context documents.
    #[serde(default)]
    pub documents: Vec<BusinessDocument>,
    /// Published LinkedIn posts, newest first.
    #[serde(default)]
    pub linkedin_posts: Vec<LinkedinPost>,
    /// Newsletter examples.
    #[serde(default)]
    pub newsletter_examples: Vec<BusinessDocument>,
    /// Marketing examples.
    #[serde(default)]
    pub marketing_examples: Vec<BusinessDocument>,
    /// Custom prompt instructions.
    #[serde(default)]
    pub custom_instructions: Option<String>,
    /// Personal stories.
    #[serde(default)]
    pub stories: Vec<PersonalStory>,
    /// Content ideas.
    #[serde(default)]
    pub ideas: Vec<ContentIdea>,
}

impl From<UserFixture> for UserData {
    fn from(f: UserFixture) -> Self {
        Self {
            profile: f.profile,
            pillars: f.pillars,
            audiences: f.audiences,
            style: f.style,
            documents: f.documents,
            linkedin_posts: f.linkedin_posts,
            newsletter_examples: f.newsletter_examples,
            marketing_examples: f.marketing_examples,
            custom_instructions: f.custom_instructions,
            stories: f.stories,
            ideas: f.ideas,
        }
    }
}

impl ProfileFixture {
    /// Parse a fixture from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid fixture document.
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("failed to parse profile fixture")
    }

    /// Load a fixture from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid fixture at {}", path.display()))
    }

    /// Build an [`InMemoryProfileSource`] holding every user in the fixture.
    pub async fn into_source(self) -> InMemoryProfileSource {
        let source = InMemoryProfileSource::new();
        for user in self.users {
            let id = user.id.clone();
            source.insert_user(&id, UserData::from(user)).await;
        }
        source
    }
}
