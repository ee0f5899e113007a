//! Personal story selection.
//!
//! Ranks a user's stories against a content idea and keeps the top
//! [`MAX_SELECTED_STORIES`]. Scoring:
//!
//! | Signal | Points |
//! |---|---|
//! | story supports the idea's pillar | +30 |
//! | story targets the idea's audience | +20 |
//! | underuse bonus | `max(10 - usage_count, 0)` |
//! | used within the last 7 days | `-(7 - days_since_use) * 2` |
//!
//! Archived stories and stories whose usage guidance restricts them to
//! other content types are dropped before scoring. Ties keep input order.

use chrono::{DateTime, Utc};

use crate::profile::{ContentIdea, ContentType, PersonalStory};

/// Maximum stories included in one prompt.
pub const MAX_SELECTED_STORIES: usize = 2;

const PILLAR_MATCH_POINTS: i64 = 30;
const AUDIENCE_MATCH_POINTS: i64 = 20;
const UNDERUSE_BONUS_CAP: u32 = 10;
const RECENCY_WINDOW_DAYS: i64 = 7;
const RECENCY_PENALTY_PER_DAY: i64 = 2;

/// Phrases marking usage guidance as a content-type restriction.
const RESTRICTION_PHRASES: &[&str] = &[
    "only use for",
    "only use in",
    "only use on",
    "only include in",
    "only include for",
    "only for",
];

/// Returns `true` if the guidance restricts the story to other content types.
///
/// Text heuristic: guidance containing a restriction phrase but not the
/// current content type's name excludes the story. Guidance phrased any
/// other way ("don't use for X") is not recognised. A blank type name never
/// counts as mentioned.
pub fn is_restricted_elsewhere(guidance: Option<&str>, content_type: &ContentType) -> bool {
    let Some(guidance) = guidance else {
        return false;
    };
    let lowered = guidance.to_lowercase();
    let restricts = RESTRICTION_PHRASES.iter().any(|p| lowered.contains(p));
    if !restricts {
        return false;
    }
    let name = content_type.as_str();
    name.is_empty() || !lowered.contains(name)
}

/// Relevance score of one story for an idea at time `now`.
pub fn score_story(story: &PersonalStory, idea: &ContentIdea, now: DateTime<Utc>) -> i64 {
    let mut score: i64 = 0;

    if let Some(pillar_id) = idea.content_pillar_id.as_deref() {
        if story.content_pillar_ids.iter().any(|id| id == pillar_id) {
            score = score.saturating_add(PILLAR_MATCH_POINTS);
        }
    }

    if let Some(audience_id) = idea.target_audience_id.as_deref() {
        if story.target_audience_ids.iter().any(|id| id == audience_id) {
            score = score.saturating_add(AUDIENCE_MATCH_POINTS);
        }
    }

    let underuse = UNDERUSE_BONUS_CAP.saturating_sub(story.usage_count);
    score = score.saturating_add(i64::from(underuse));

    if let Some(last_used) = story.last_used_date {
        // Whole days, truncated; a future timestamp counts as used today.
        let days = now.signed_duration_since(last_used).num_days().max(0);
        if days < RECENCY_WINDOW_DAYS {
            let penalty = RECENCY_WINDOW_DAYS
                .saturating_sub(days)
                .saturating_mul(RECENCY_PENALTY_PER_DAY);
            score = score.saturating_sub(penalty);
        }
    }

    score
}

/// Score every eligible story, highest first, ties in input order.
pub fn rank_stories<'a>(
    stories: &'a [PersonalStory],
    idea: &ContentIdea,
    content_type: &ContentType,
    now: DateTime<Utc>,
) -> Vec<(&'a PersonalStory, i64)> {
    let mut scored: Vec<(&PersonalStory, i64)> = stories
        .iter()
        .filter(|s| !s.is_archived)
        .filter(|s| !is_restricted_elsewhere(s.usage_guidance.as_deref(), content_type))
        .map(|s| (s, score_story(s, idea, now)))
        .collect();

    // `sort_by` is stable, which keeps ties in input order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}

/// Select up to [`MAX_SELECTED_STORIES`] stories for an idea.
pub fn select_relevant_stories(
    stories: &[PersonalStory],
    idea: &ContentIdea,
    content_type: &ContentType,
    now: DateTime<Utc>,
) -> Vec<PersonalStory> {
    rank_stories(stories, idea, content_type, now)
        .into_iter()
        .take(MAX_SELECTED_STORIES)
        .map(|(story, _)| story.clone())
        .collect()
}
