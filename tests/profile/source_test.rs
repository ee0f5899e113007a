//! Tests for the in-memory profile source.

use pillarpost::profile::source::{InMemoryProfileSource, ProfileSource, SourceError, UserData};
use pillarpost::profile::{BusinessDocument, ContentIdea, ContentPillar, ContentType, LinkedinPost};

fn post(id: &str) -> LinkedinPost {
    LinkedinPost {
        id: id.to_owned(),
        content: format!("Post {id}"),
        published_at: None,
    }
}

fn doc(id: &str) -> BusinessDocument {
    BusinessDocument {
        id: id.to_owned(),
        title: format!("Doc {id}"),
        content: format!("Body {id}"),
    }
}

async fn seeded() -> InMemoryProfileSource {
    let source = InMemoryProfileSource::new();
    let data = UserData {
        pillars: vec![ContentPillar {
            id: "p1".to_owned(),
            name: "Data strategy".to_owned(),
            description: String::new(),
        }],
        linkedin_posts: vec![post("1"), post("2"), post("3")],
        newsletter_examples: vec![doc("n1"), doc("n2")],
        custom_instructions: Some("Use UK spelling".to_owned()),
        ideas: vec![ContentIdea {
            id: "idea-1".to_owned(),
            title: "Why dashboards fail".to_owned(),
            description: None,
            notes: None,
            content_type: ContentType::Linkedin,
            content_pillar_id: None,
            target_audience_id: None,
            regeneration_instructions: None,
        }],
        ..UserData::default()
    };
    source.insert_user("u1", data).await;
    source
}

#[tokio::test]
async fn missing_data_is_empty_not_error() {
    let source = seeded().await;
    assert!(source.fetch_user_profile("u1").await.expect("ok").is_none());
    assert!(source.fetch_target_audiences("u1").await.expect("ok").is_empty());
    assert!(source
        .fetch_writing_style_profile("u1")
        .await
        .expect("ok")
        .is_none());
    assert!(source.fetch_personal_stories("u1").await.expect("ok").is_empty());
}

#[tokio::test]
async fn unknown_user_is_an_error() {
    let source = seeded().await;
    let err = source
        .fetch_content_pillars("ghost")
        .await
        .expect_err("unknown user");
    assert!(matches!(err, SourceError::UnknownUser(ref id) if id == "ghost"));
    assert_eq!(err.to_string(), "unknown user: ghost");
}

#[tokio::test]
async fn example_fetches_respect_limit_and_order() {
    let source = seeded().await;
    let posts = source
        .fetch_recent_linkedin_posts("u1", 2)
        .await
        .expect("posts");
    let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);

    let newsletters = source
        .fetch_newsletter_examples("u1", 10)
        .await
        .expect("newsletters");
    assert_eq!(newsletters.len(), 2);
    assert!(source
        .fetch_marketing_examples("u1", 3)
        .await
        .expect("marketing")
        .is_empty());
}

#[tokio::test]
async fn update_user_edits_in_place() {
    let source = seeded().await;
    source
        .update_user("u1", |d| d.custom_instructions = None)
        .await
        .expect("update");
    assert!(source
        .fetch_custom_prompt_instructions("u1")
        .await
        .expect("ok")
        .is_none());

    let missing = source.update_user("ghost", |_| {}).await;
    assert!(matches!(missing, Err(SourceError::UnknownUser(_))));
}

#[tokio::test]
async fn find_idea_by_id() {
    let source = seeded().await;
    let idea = source.find_idea("u1", "idea-1").await.expect("found");
    assert_eq!(idea.title, "Why dashboards fail");
    assert!(source.find_idea("u1", "idea-2").await.is_none());
    assert!(source.find_idea("ghost", "idea-1").await.is_none());
}

#[test]
fn backend_error_names_operation() {
    let err = SourceError::Backend {
        operation: "fetch_content_pillars",
        message: "timeout".to_owned(),
    };
    assert_eq!(err.to_string(), "fetch_content_pillars failed: timeout");
}
