//! Tests for base and final prompt assembly.

use std::sync::Arc;
use std::time::Duration;

use pillarpost::config::ExamplesConfig;
use pillarpost::profile::source::{ProfileSource, UserData};
use pillarpost::profile::ContentType;
use pillarpost::prompt::assembler::{PromptAssembler, PromptError};
use pillarpost::prompt::cache::PromptCache;
use pillarpost::prompt::sections::{CONTENT_IDEA_TITLE, REGENERATION_TITLE, TASK_TITLE};

use crate::support::{
    fixed_now, full_user, idea, source_with, story, CountingSource, FailingPillarsSource,
    GatedSource, USER,
};

const BASE_FETCHES: [&str; 5] = [
    "fetch_user_profile",
    "fetch_content_pillars",
    "fetch_target_audiences",
    "fetch_writing_style_profile",
    "fetch_business_documents",
];

async fn counting_assembler(data: UserData) -> (PromptAssembler, Arc<CountingSource>) {
    let source = CountingSource::new(source_with(data).await);
    let shared: Arc<dyn ProfileSource> = source.clone();
    (PromptAssembler::new(shared, PromptCache::default()), source)
}

async fn assembler(data: UserData) -> PromptAssembler {
    counting_assembler(data).await.0
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} missing from prompt"))
}

// ---------------------------------------------------------------------------
// Base prompt
// ---------------------------------------------------------------------------

#[tokio::test]
async fn base_sections_follow_canonical_order() {
    let a = assembler(full_user()).await;
    let base = a
        .assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect("base prompt");

    let order = [
        "You are an expert content writer",
        "## Business Context\n",
        "## Voice Analysis",
        "## General Style Guide",
        "## LinkedIn Style Guide",
        "## Vocabulary Patterns to Use",
        "## Content Pillars",
        "## Target Audiences",
        "## Business Context Documents",
        "## LinkedIn Best Practices",
        "## Content Guidelines",
    ];
    let positions: Vec<usize> = order.iter().map(|n| position(&base, n)).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted, "sections out of order");
}

#[tokio::test]
async fn base_prompt_never_contains_task() {
    for ct in [
        ContentType::Linkedin,
        ContentType::Newsletter,
        ContentType::Marketing,
        ContentType::parse("podcast"),
    ] {
        let a = assembler(full_user()).await;
        let base = a.assemble_base(USER, &ct).await.expect("base prompt");
        assert!(!base.contains(TASK_TITLE), "task leaked into {ct} base prompt");

        let full = a
            .assemble_final_at(USER, &idea(), &ct, fixed_now())
            .await
            .expect("final prompt");
        assert_eq!(full.text.matches(TASK_TITLE).count(), 1);
    }
}

#[tokio::test]
async fn empty_profile_renders_placeholders() {
    let data = UserData {
        profile: None,
        ..UserData::default()
    };
    let a = assembler(data).await;
    let base = a
        .assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect("base prompt");
    assert!(base.contains("## Business Context\nNot specified"));
    assert!(base.contains("## Content Pillars\n- No content pillars defined"));
    assert!(base.contains("## Target Audiences\n- No target audiences defined"));
    assert!(base.contains("## Writing Style\nNo writing style profile available"));
    assert!(!base.contains("## Business Context Documents"));
}

#[tokio::test]
async fn second_base_call_hits_cache() {
    let (a, source) = counting_assembler(full_user()).await;
    let first = a
        .assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect("first");
    let second = a
        .assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect("second");
    assert_eq!(first, second);
    for method in BASE_FETCHES {
        assert_eq!(source.calls(method), 1, "{method} fetched more than once");
    }
}

#[tokio::test]
async fn content_types_are_cached_separately() {
    let (a, source) = counting_assembler(full_user()).await;
    a.assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect("linkedin");
    a.assemble_base(USER, &ContentType::Newsletter)
        .await
        .expect("newsletter");
    assert_eq!(source.calls("fetch_content_pillars"), 2);
}

#[tokio::test]
async fn invalidate_forces_refetch_and_picks_up_edits() {
    let (a, source) = counting_assembler(full_user()).await;
    let before = a
        .assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect("before");
    assert!(!before.contains("Hiring"));

    source
        .inner()
        .update_user(USER, |d| {
            d.pillars.push(crate::support::pillar("p3", "Hiring", "Building teams"))
        })
        .await
        .expect("update");

    let stale = a
        .assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect("stale");
    assert_eq!(stale, before, "cache should serve until invalidated");

    a.invalidate_user_cache(USER).await;
    let fresh = a
        .assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect("fresh");
    assert!(fresh.contains("- Hiring: Building teams"));
    assert_eq!(source.calls("fetch_content_pillars"), 2);
}

#[tokio::test]
async fn invalidation_during_assembly_is_not_overwritten() {
    let mut data = full_user();
    if let Some(p) = data.profile.as_mut() {
        p.business_description = Some("OLD description".to_owned());
    }
    let source = GatedSource::new(source_with(data).await);
    let shared: Arc<dyn ProfileSource> = source.clone();
    let a = Arc::new(PromptAssembler::new(shared, PromptCache::default()));

    let in_flight = tokio::spawn({
        let a = Arc::clone(&a);
        async move { a.assemble_base(USER, &ContentType::Linkedin).await }
    });

    source.entered.notified().await;
    source
        .inner()
        .update_user(USER, |d| {
            if let Some(p) = d.profile.as_mut() {
                p.business_description = Some("NEW description".to_owned());
            }
        })
        .await
        .expect("update");
    a.invalidate_user_cache(USER).await;
    source.release.notify_one();

    let stale = in_flight.await.expect("join").expect("in-flight base");
    assert!(stale.contains("OLD description"));
    assert!(a.cache().is_empty().await, "stale prompt must not be cached");

    let fresh = a
        .assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect("fresh base");
    assert!(fresh.contains("NEW description"));
    assert!(!fresh.contains("OLD description"));
}

#[tokio::test(start_paused = true)]
async fn expired_cache_entry_triggers_refetch() {
    let source = CountingSource::new(source_with(full_user()).await);
    let shared: Arc<dyn ProfileSource> = source.clone();
    let a = PromptAssembler::new(shared, PromptCache::new(Duration::from_secs(300)));

    a.assemble_base(USER, &ContentType::Marketing)
        .await
        .expect("first");
    tokio::time::advance(Duration::from_secs(301)).await;
    a.assemble_base(USER, &ContentType::Marketing)
        .await
        .expect("second");
    assert_eq!(source.calls("fetch_user_profile"), 2);
}

#[tokio::test]
async fn fetch_failure_propagates_and_caches_nothing() {
    let a = PromptAssembler::new(Arc::new(FailingPillarsSource), PromptCache::default());
    let err = a
        .assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect_err("pillar fetch fails");
    assert!(matches!(err, PromptError::Source(_)));
    assert!(err.to_string().contains("connection reset"));
    assert!(a.cache().is_empty().await);

    let final_err = a
        .assemble_final_at(USER, &idea(), &ContentType::Linkedin, fixed_now())
        .await;
    assert!(final_err.is_err());
}

#[tokio::test]
async fn unknown_user_is_an_upstream_error() {
    let a = assembler(full_user()).await;
    let result = a.assemble_base("nobody", &ContentType::Linkedin).await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Final prompt
// ---------------------------------------------------------------------------

#[tokio::test]
async fn final_prompt_extends_base_and_ends_with_task() {
    let a = assembler(full_user()).await;
    let base = a
        .assemble_base(USER, &ContentType::Linkedin)
        .await
        .expect("base");
    let full = a
        .assemble_final_at(USER, &idea(), &ContentType::Linkedin, fixed_now())
        .await
        .expect("final");

    assert!(full.text.starts_with(&base));
    let task_pos = position(&full.text, TASK_TITLE);
    let last_section = full.text.rfind("\n## ").expect("has sections");
    assert_eq!(task_pos, last_section.saturating_add(1));
}

#[tokio::test]
async fn final_prompt_tail_order() {
    let mut data = full_user();
    let mut s = story("s1");
    s.content_pillar_ids = vec!["p1".to_owned()];
    data.stories = vec![s];
    let mut i = idea();
    i.notes = Some("Content Goal: conversion\nCall to Action: Start a trial".to_owned());
    i.regeneration_instructions = Some("Make it shorter".to_owned());

    let a = assembler(data).await;
    let text = a
        .assemble_final_at(USER, &i, &ContentType::Linkedin, fixed_now())
        .await
        .expect("final")
        .text;

    let order = [
        "## Examples of Previous LinkedIn Content",
        "## Patterns to Avoid",
        "## Content Goal",
        "## Call to Action",
        "## Personal Stories",
        CONTENT_IDEA_TITLE,
        "## Custom Instructions",
        REGENERATION_TITLE,
        TASK_TITLE,
    ];
    let positions: Vec<usize> = order.iter().map(|n| position(&text, n)).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted, "final sections out of order");
}

#[tokio::test]
async fn lead_generation_goal_adds_guidance() {
    let a = assembler(full_user()).await;
    let mut i = idea();
    i.notes = Some("Content Goal: lead_generation\n".to_owned());
    let text = a
        .assemble_final_at(USER, &i, &ContentType::Linkedin, fixed_now())
        .await
        .expect("final")
        .text;
    assert!(text.contains("## Content Goal\nGoal: lead_generation"));
    assert!(text.contains("This content should generate leads."));
}

#[tokio::test]
async fn notes_without_goal_produce_no_goal_section() {
    let a = assembler(full_user()).await;
    let mut i = idea();
    i.notes = Some("Remember the dashboard graveyard joke.".to_owned());
    let text = a
        .assemble_final_at(USER, &i, &ContentType::Linkedin, fixed_now())
        .await
        .expect("final")
        .text;
    assert!(!text.contains("## Content Goal"));
    assert!(!text.contains("## Call to Action"));
}

#[tokio::test]
async fn cta_section_contains_value() {
    let a = assembler(full_user()).await;
    let mut i = idea();
    i.notes = Some("Call to Action: Book a demo".to_owned());
    let text = a
        .assemble_final_at(USER, &i, &ContentType::Linkedin, fixed_now())
        .await
        .expect("final")
        .text;
    let cta_pos = position(&text, "## Call to Action");
    let idea_pos = position(&text, CONTENT_IDEA_TITLE);
    let cta_body = &text[cta_pos..idea_pos];
    assert!(cta_body.contains("Book a demo"));
}

#[tokio::test]
async fn regeneration_sits_between_idea_and_task() {
    let a = assembler(full_user()).await;
    let mut i = idea();
    i.regeneration_instructions = Some("Make it shorter".to_owned());
    let text = a
        .assemble_final_at(USER, &i, &ContentType::Linkedin, fixed_now())
        .await
        .expect("final")
        .text;

    let idea_pos = position(&text, CONTENT_IDEA_TITLE);
    let regen_pos = position(&text, REGENERATION_TITLE);
    let task_pos = position(&text, TASK_TITLE);
    assert!(idea_pos < regen_pos && regen_pos < task_pos);
    assert!(text[regen_pos..task_pos].contains("Make it shorter"));
}

#[tokio::test]
async fn no_regeneration_section_without_instructions() {
    let a = assembler(full_user()).await;
    let text = a
        .assemble_final_at(USER, &idea(), &ContentType::Linkedin, fixed_now())
        .await
        .expect("final")
        .text;
    assert!(!text.contains(REGENERATION_TITLE));
}

#[tokio::test]
async fn final_prompt_is_byte_identical_on_repeat() {
    let mut data = full_user();
    data.stories = vec![story("s1"), story("s2"), story("s3")];
    let (a, source) = counting_assembler(data).await;
    let mut i = idea();
    i.notes = Some("Content Goal: nurturing\nCall to Action: Reply".to_owned());

    let first = a
        .assemble_final_at(USER, &i, &ContentType::Linkedin, fixed_now())
        .await
        .expect("first");
    let second = a
        .assemble_final_at(USER, &i, &ContentType::Linkedin, fixed_now())
        .await
        .expect("second");
    assert_eq!(first, second);
    assert_eq!(source.calls("fetch_user_profile"), 1);
}

#[tokio::test]
async fn selected_story_ids_reported_and_archived_excluded() {
    let mut data = full_user();
    let mut archived = story("archived");
    archived.is_archived = true;
    archived.content_pillar_ids = vec!["p1".to_owned()];
    data.stories = vec![archived, story("s1"), story("s2"), story("s3")];

    let a = assembler(data).await;
    let full = a
        .assemble_final_at(USER, &idea(), &ContentType::Linkedin, fixed_now())
        .await
        .expect("final");
    assert_eq!(full.selected_story_ids, vec!["s1", "s2"]);
    assert!(!full.text.contains("Story archived"));
    assert!(full.text.contains("### Story s1"));
    assert!(!full.text.contains("### Story s3"));
    assert!(full.estimated_tokens > 0);
}

#[tokio::test]
async fn omitted_sections_leave_no_placeholder() {
    let mut data = full_user();
    data.custom_instructions = None;
    data.linkedin_posts.clear();
    if let Some(style) = data.style.as_mut() {
        style.avoid_patterns = None;
        style.linkedin_examples.clear();
    }
    let a = assembler(data).await;
    let text = a
        .assemble_final_at(USER, &idea(), &ContentType::Linkedin, fixed_now())
        .await
        .expect("final")
        .text;
    assert!(!text.contains("## Personal Stories"));
    assert!(!text.contains("## Patterns to Avoid"));
    assert!(!text.contains("## Custom Instructions"));
    assert!(!text.contains("## Examples of Previous"));
}

#[tokio::test]
async fn style_profile_examples_used_when_none_fetched() {
    let mut data = full_user();
    data.linkedin_posts.clear();
    let a = assembler(data).await;
    let text = a
        .assemble_final_at(USER, &idea(), &ContentType::Linkedin, fixed_now())
        .await
        .expect("final")
        .text;
    assert!(text.contains("Style profile example post"));
}

#[tokio::test]
async fn example_limit_is_applied() {
    let mut data = full_user();
    data.newsletter_examples = (0..5)
        .map(|n| pillarpost::profile::BusinessDocument {
            id: format!("n{n}"),
            title: format!("Issue {n}"),
            content: format!("Newsletter issue number {n}"),
        })
        .collect();
    let (a, source) = counting_assembler(data).await;
    let a = a.with_examples(ExamplesConfig {
        newsletter_limit: 2,
        ..ExamplesConfig::default()
    });
    let text = a
        .assemble_final_at(USER, &idea(), &ContentType::Newsletter, fixed_now())
        .await
        .expect("final")
        .text;
    assert!(text.contains("Newsletter issue number 1"));
    assert!(!text.contains("Newsletter issue number 2"));
    assert_eq!(source.calls("fetch_newsletter_examples"), 1);
    assert_eq!(source.calls("fetch_recent_linkedin_posts"), 0);
}

#[tokio::test]
async fn custom_instructions_fall_back_to_style_profile() {
    let mut data = full_user();
    data.custom_instructions = None;
    if let Some(style) = data.style.as_mut() {
        style.custom_instructions = Some("Sign off with 'Cheers'.".to_owned());
    }
    let a = assembler(data).await;
    let text = a
        .create_final_prompt(USER, &idea(), &ContentType::Linkedin)
        .await
        .expect("final");
    assert!(text.contains("## Custom Instructions\nSign off with 'Cheers'."));
}
