//! Base and final prompt assembly.
//!
//! The base prompt depends only on `(user, content type)` and is cached. The
//! final prompt is rebuilt on every call from the base prompt plus
//! idea-specific sections, and always ends with the task instruction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::cache::PromptCache;
use super::notes::parse_idea_notes;
use super::sections;
use super::stories::select_relevant_stories;
use super::{append_rendered, estimate_tokens, PromptStructure};
use crate::config::{Config, ExamplesConfig};
use crate::profile::source::{ProfileSource, SourceError};
use crate::profile::{ContentIdea, ContentType, WritingStyleProfile};

/// Errors from prompt assembly.
///
/// Missing data is never an error; only upstream fetch failures are.
#[derive(Debug, Error)]
pub enum PromptError {
    /// An upstream fetch failed. Nothing was cached.
    #[error("profile fetch failed: {0}")]
    Source(#[from] SourceError),
}

/// A final prompt plus what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalPrompt {
    /// Prompt text, ready to send to the generation model.
    pub text: String,
    /// Ids of the personal stories included, in prompt order. Callers bump
    /// their usage counters once generation succeeds.
    pub selected_story_ids: Vec<String>,
    /// Rough token estimate of `text`.
    pub estimated_tokens: u64,
}

/// Assembles prompts from a [`ProfileSource`], memoising base prompts.
pub struct PromptAssembler {
    source: Arc<dyn ProfileSource>,
    cache: PromptCache,
    examples: ExamplesConfig,
}

impl std::fmt::Debug for PromptAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptAssembler")
            .field("cache_ttl", &self.cache.ttl())
            .field("examples", &self.examples)
            .finish_non_exhaustive()
    }
}

impl PromptAssembler {
    /// Create an assembler with default example limits.
    pub fn new(source: Arc<dyn ProfileSource>, cache: PromptCache) -> Self {
        Self {
            source,
            cache,
            examples: ExamplesConfig::default(),
        }
    }

    /// Create an assembler with the cache TTL and example limits from `config`.
    pub fn from_config(source: Arc<dyn ProfileSource>, config: &Config) -> Self {
        Self {
            source,
            cache: PromptCache::new(config.cache.ttl()),
            examples: config.examples.clone(),
        }
    }

    /// Replace the example limits.
    #[must_use]
    pub fn with_examples(mut self, examples: ExamplesConfig) -> Self {
        self.examples = examples;
        self
    }

    /// The base-prompt cache.
    pub fn cache(&self) -> &PromptCache {
        &self.cache
    }

    /// Drop every cached base prompt for a user.
    ///
    /// Must be called after any write to the user's profile, pillars,
    /// audiences or writing style.
    pub async fn invalidate_user_cache(&self, user_id: &str) {
        let removed = self.cache.invalidate(user_id).await;
        info!(user_id, removed, "user prompt cache invalidated");
    }

    /// Build (or fetch from cache) the idea-independent base prompt.
    ///
    /// Section order: intro, business context, writing style (voice,
    /// general, content-type guide, vocabulary), content pillars, target
    /// audiences, business documents, best practices, content guidelines.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Source`] if any upstream fetch fails. Nothing
    /// is cached in that case.
    #[instrument(skip(self, content_type), fields(content_type = %content_type))]
    pub async fn assemble_base(
        &self,
        user_id: &str,
        content_type: &ContentType,
    ) -> Result<String, PromptError> {
        if let Some(cached) = self.cache.get(user_id, content_type).await {
            debug!("base prompt cache hit");
            return Ok(cached);
        }
        debug!("base prompt cache miss");
        let generation = self.cache.generation(user_id).await;

        let src = &self.source;
        let (profile, pillars, audiences, style, documents) = tokio::try_join!(
            src.fetch_user_profile(user_id),
            src.fetch_content_pillars(user_id),
            src.fetch_target_audiences(user_id),
            src.fetch_writing_style_profile(user_id),
            src.fetch_business_documents(user_id),
        )
        .inspect_err(|e| warn!(error = %e, "base prompt fetch failed"))?;

        let mut structure = PromptStructure::new();
        structure.push(sections::intro_section(profile.as_ref(), content_type));
        structure.push(sections::business_context_section(profile.as_ref()));
        structure.extend(sections::writing_style_sections(
            style.as_ref(),
            content_type,
        ));
        structure.push(sections::content_pillars_section(&pillars));
        structure.push(sections::target_audiences_section(&audiences));
        structure.push_opt(sections::business_documents_section(&documents));
        structure.push(sections::best_practices_section(content_type));
        structure.push(sections::content_guidelines_section(content_type));

        let prompt = structure.render();
        let cached = self
            .cache
            .put_if_current(user_id, content_type, prompt.clone(), generation)
            .await;
        debug!(
            sections = structure.sections().len(),
            cached,
            chars = prompt.chars().count(),
            "base prompt assembled"
        );
        Ok(prompt)
    }

    /// Build the final prompt for an idea.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Source`] if any upstream fetch fails.
    pub async fn assemble_final(
        &self,
        user_id: &str,
        idea: &ContentIdea,
        content_type: &ContentType,
    ) -> Result<String, PromptError> {
        Ok(self
            .assemble_final_detailed(user_id, idea, content_type)
            .await?
            .text)
    }

    /// Entry point used by the generation flow. Same as [`Self::assemble_final`].
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Source`] if any upstream fetch fails.
    pub async fn create_final_prompt(
        &self,
        user_id: &str,
        idea: &ContentIdea,
        content_type: &ContentType,
    ) -> Result<String, PromptError> {
        self.assemble_final(user_id, idea, content_type).await
    }

    /// Build the final prompt and report which stories it used.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Source`] if any upstream fetch fails.
    pub async fn assemble_final_detailed(
        &self,
        user_id: &str,
        idea: &ContentIdea,
        content_type: &ContentType,
    ) -> Result<FinalPrompt, PromptError> {
        self.assemble_final_at(user_id, idea, content_type, Utc::now())
            .await
    }

    /// Build the final prompt, scoring story recency against `now`.
    ///
    /// Section order after the base prompt: examples, patterns to avoid,
    /// content goal, call to action, personal stories, content idea, custom
    /// instructions, regeneration instructions, task.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Source`] if any upstream fetch fails.
    #[instrument(
        skip(self, idea, content_type, now),
        fields(idea_id = %idea.id, content_type = %content_type)
    )]
    pub async fn assemble_final_at(
        &self,
        user_id: &str,
        idea: &ContentIdea,
        content_type: &ContentType,
        now: DateTime<Utc>,
    ) -> Result<FinalPrompt, PromptError> {
        let base = self.assemble_base(user_id, content_type).await?;

        let src = &self.source;
        let (examples, style, stories, custom) = tokio::try_join!(
            self.fetch_examples(user_id, content_type),
            src.fetch_writing_style_profile(user_id),
            src.fetch_personal_stories(user_id),
            src.fetch_custom_prompt_instructions(user_id),
        )
        .inspect_err(|e| warn!(error = %e, "final prompt fetch failed"))?;

        let examples = if examples.is_empty() {
            style_examples(style.as_ref(), content_type)
        } else {
            examples
        };
        let custom = custom.or_else(|| style.as_ref().and_then(|s| s.custom_instructions.clone()));
        let directives = parse_idea_notes(idea.notes.as_deref());
        let selected = select_relevant_stories(&stories, idea, content_type, now);

        let mut tail = PromptStructure::new();
        tail.push_opt(sections::examples_section(
            content_type,
            &examples,
            self.examples.max_example_chars,
        ));
        tail.push_opt(sections::patterns_to_avoid_section(style.as_ref()));
        if let Some(goal) = &directives.goal {
            tail.push(sections::content_goal_section(goal));
        }
        if let Some(cta) = &directives.call_to_action {
            tail.push(sections::call_to_action_section(cta));
        }
        tail.push_opt(sections::personal_stories_section(&selected));
        tail.push(sections::content_idea_section(idea));
        tail.push_opt(sections::custom_instructions_section(custom.as_deref()));
        if let Some(instructions) = idea.regeneration_instructions.as_deref() {
            tail.push_opt(sections::regeneration_section(instructions));
        }
        tail.push(sections::task_section(content_type));

        let text = append_rendered(&base, &tail);
        let estimated_tokens = estimate_tokens(&text);
        info!(
            chars = text.chars().count(),
            estimated_tokens,
            stories = selected.len(),
            goal = directives.goal.as_ref().map(|g| g.as_str()),
            regeneration = idea.regeneration_instructions.is_some(),
            "final prompt assembled"
        );

        Ok(FinalPrompt {
            text,
            selected_story_ids: selected.into_iter().map(|s| s.id).collect(),
            estimated_tokens,
        })
    }

    /// Prior examples for the content type, newest first, as plain text.
    async fn fetch_examples(
        &self,
        user_id: &str,
        content_type: &ContentType,
    ) -> Result<Vec<String>, SourceError> {
        let limits = &self.examples;
        let examples = match content_type {
            ContentType::Linkedin => self
                .source
                .fetch_recent_linkedin_posts(user_id, limits.linkedin_limit)
                .await?
                .into_iter()
                .map(|p| p.content)
                .collect(),
            ContentType::Newsletter => self
                .source
                .fetch_newsletter_examples(user_id, limits.newsletter_limit)
                .await?
                .into_iter()
                .map(|d| d.content)
                .collect(),
            ContentType::Marketing => self
                .source
                .fetch_marketing_examples(user_id, limits.marketing_limit)
                .await?
                .into_iter()
                .map(|d| d.content)
                .collect(),
            ContentType::Other(_) => Vec::new(),
        };
        Ok(examples)
    }
}

/// Examples stored on the style profile, used when none were fetched.
fn style_examples(style: Option<&WritingStyleProfile>, content_type: &ContentType) -> Vec<String> {
    let Some(style) = style else {
        return Vec::new();
    };
    match content_type {
        ContentType::Linkedin => style.linkedin_examples.clone(),
        ContentType::Newsletter => style.newsletter_examples.clone(),
        ContentType::Marketing => style.marketing_examples.clone(),
        ContentType::Other(_) => Vec::new(),
    }
}
