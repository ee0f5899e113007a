//! Data-fetch contracts between prompt assembly and the persistence layer.
//!
//! [`ProfileSource`] is the only way prompt assembly reads user data.
//! [`InMemoryProfileSource`] backs the preview CLI and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use super::{
    BusinessDocument, ContentIdea, ContentPillar, LinkedinPost, PersonalStory, TargetAudience,
    UserProfile, WritingStyleProfile,
};

/// Errors raised by a [`ProfileSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store failed while serving a read.
    #[error("{operation} failed: {message}")]
    Backend {
        /// Which fetch failed (e.g. `fetch_content_pillars`).
        operation: &'static str,
        /// Backend error description.
        message: String,
    },

    /// The user id is not known to the store.
    #[error("unknown user: {0}")]
    UnknownUser(String),
}

/// Read-only access to a user's stored profile data.
///
/// All implementations must be `Send + Sync` so one source can be shared by
/// concurrent assemblies. Empty collections and `None` are normal results,
/// not errors.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// The user's profile, if one exists.
    async fn fetch_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, SourceError>;

    /// Content pillars in creation order.
    async fn fetch_content_pillars(&self, user_id: &str)
        -> Result<Vec<ContentPillar>, SourceError>;

    /// Target audiences in creation order.
    async fn fetch_target_audiences(
        &self,
        user_id: &str,
    ) -> Result<Vec<TargetAudience>, SourceError>;

    /// The user's writing style profile, if analysed.
    async fn fetch_writing_style_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<WritingStyleProfile>, SourceError>;

    /// Business-context documents the user uploaded.
    async fn fetch_business_documents(
        &self,
        user_id: &str,
    ) -> Result<Vec<BusinessDocument>, SourceError>;

    /// Up to `limit` most recent LinkedIn posts.
    async fn fetch_recent_linkedin_posts(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<LinkedinPost>, SourceError>;

    /// Up to `limit` newsletter examples.
    async fn fetch_newsletter_examples(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<BusinessDocument>, SourceError>;

    /// Up to `limit` marketing examples.
    async fn fetch_marketing_examples(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<BusinessDocument>, SourceError>;

    /// Custom prompt instructions configured by the user, if any.
    async fn fetch_custom_prompt_instructions(
        &self,
        user_id: &str,
    ) -> Result<Option<String>, SourceError>;

    /// All of the user's personal stories, archived ones included.
    async fn fetch_personal_stories(
        &self,
        user_id: &str,
    ) -> Result<Vec<PersonalStory>, SourceError>;
}

/// Everything stored for one user.
#[derive(Debug, Clone, Default)]
pub struct UserData {
    /// Profile, if created.
    pub profile: Option<UserProfile>,
    /// Content pillars.
    pub pillars: Vec<ContentPillar>,
    /// Target audiences.
    pub audiences: Vec<TargetAudience>,
    /// Writing style profile, if analysed.
    pub style: Option<WritingStyleProfile>,
    /// Business-context documents.
    pub documents: Vec<BusinessDocument>,
    /// Published LinkedIn posts, newest first.
    pub linkedin_posts: Vec<LinkedinPost>,
    /// Newsletter examples.
    pub newsletter_examples: Vec<BusinessDocument>,
    /// Marketing examples.
    pub marketing_examples: Vec<BusinessDocument>,
    /// Custom prompt instructions.
    pub custom_instructions: Option<String>,
    /// Personal stories.
    pub stories: Vec<PersonalStory>,
    /// Content ideas (not read by assembly; used by the CLI to look ideas up).
    pub ideas: Vec<ContentIdea>,
}

/// In-memory [`ProfileSource`] keyed by user id.
///
/// Unknown user ids produce [`SourceError::UnknownUser`].
pub struct InMemoryProfileSource {
    users: Arc<RwLock<HashMap<String, UserData>>>,
}

impl InMemoryProfileSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace all data for a user.
    pub async fn insert_user(&self, user_id: &str, data: UserData) {
        let mut users = self.users.write().await;
        users.insert(user_id.to_owned(), data);
    }

    /// Apply an in-place edit to a user's data.
    ///
    /// Callers that edit profile, pillars, audiences or style must also
    /// invalidate the prompt cache for that user.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnknownUser`] if the user does not exist.
    pub async fn update_user<F>(&self, user_id: &str, edit: F) -> Result<(), SourceError>
    where
        F: FnOnce(&mut UserData),
    {
        let mut users = self.users.write().await;
        let data = users
            .get_mut(user_id)
            .ok_or_else(|| SourceError::UnknownUser(user_id.to_owned()))?;
        edit(data);
        Ok(())
    }

    /// Look up a content idea by id.
    pub async fn find_idea(&self, user_id: &str, idea_id: &str) -> Option<ContentIdea> {
        let users = self.users.read().await;
        users
            .get(user_id)?
            .ideas
            .iter()
            .find(|idea| idea.id == idea_id)
            .cloned()
    }

    /// Read a projection of one user's data.
    async fn read<T>(
        &self,
        user_id: &str,
        project: impl FnOnce(&UserData) -> T,
    ) -> Result<T, SourceError> {
        let users = self.users.read().await;
        users
            .get(user_id)
            .map(project)
            .ok_or_else(|| SourceError::UnknownUser(user_id.to_owned()))
    }
}

impl Default for InMemoryProfileSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileSource for InMemoryProfileSource {
    async fn fetch_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, SourceError> {
        self.read(user_id, |d| d.profile.clone()).await
    }

    async fn fetch_content_pillars(
        &self,
        user_id: &str,
    ) -> Result<Vec<ContentPillar>, SourceError> {
        self.read(user_id, |d| d.pillars.clone()).await
    }

    async fn fetch_target_audiences(
        &self,
        user_id: &str,
    ) -> Result<Vec<TargetAudience>, SourceError> {
        self.read(user_id, |d| d.audiences.clone()).await
    }

    async fn fetch_writing_style_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<WritingStyleProfile>, SourceError> {
        self.read(user_id, |d| d.style.clone()).await
    }

    async fn fetch_business_documents(
        &self,
        user_id: &str,
    ) -> Result<Vec<BusinessDocument>, SourceError> {
        self.read(user_id, |d| d.documents.clone()).await
    }

    async fn fetch_recent_linkedin_posts(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<LinkedinPost>, SourceError> {
        self.read(user_id, |d| {
            d.linkedin_posts.iter().take(limit).cloned().collect()
        })
        .await
    }

    async fn fetch_newsletter_examples(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<BusinessDocument>, SourceError> {
        self.read(user_id, |d| {
            d.newsletter_examples.iter().take(limit).cloned().collect()
        })
        .await
    }

    async fn fetch_marketing_examples(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<BusinessDocument>, SourceError> {
        self.read(user_id, |d| {
            d.marketing_examples.iter().take(limit).cloned().collect()
        })
        .await
    }

    async fn fetch_custom_prompt_instructions(
        &self,
        user_id: &str,
    ) -> Result<Option<String>, SourceError> {
        self.read(user_id, |d| d.custom_instructions.clone()).await
    }

    async fn fetch_personal_stories(
        &self,
        user_id: &str,
    ) -> Result<Vec<PersonalStory>, SourceError> {
        self.read(user_id, |d| d.stories.clone()).await
    }
}
