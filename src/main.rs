//! Pillarpost CLI entry point.
//!
//! Renders prompts from a TOML profile fixture so prompt changes can be
//! reviewed without running the application: `base` prints the cached base
//! prompt, `final` prints the full prompt for an idea, and `stories` shows
//! which personal stories an idea would pull in.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use pillarpost::config::{load_or_default, Config, LoggingConfig};
use pillarpost::logging::{self, LoggingGuard};
use pillarpost::profile::fixture::ProfileFixture;
use pillarpost::profile::source::{InMemoryProfileSource, ProfileSource};
use pillarpost::profile::{ContentIdea, ContentType};
use pillarpost::prompt::assembler::PromptAssembler;
use pillarpost::prompt::stories::{rank_stories, MAX_SELECTED_STORIES};

/// Render content-generation prompts from stored profile data.
#[derive(Parser)]
#[command(name = "pillarpost", version, about)]
struct Cli {
    /// Config file (defaults to `~/.pillarpost/config.toml` when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write JSON logs to this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Print the base prompt for a user and content type.
    Base {
        /// Profile fixture file.
        #[arg(long)]
        fixture: PathBuf,
        /// User id.
        #[arg(long)]
        user: String,
        /// Content type (linkedin, newsletter, marketing).
        #[arg(long)]
        content_type: String,
    },
    /// Print the final prompt for one of the user's ideas.
    Final {
        /// Profile fixture file.
        #[arg(long)]
        fixture: PathBuf,
        /// User id.
        #[arg(long)]
        user: String,
        /// Idea id.
        #[arg(long)]
        idea: String,
        /// Override the idea's content type.
        #[arg(long)]
        content_type: Option<String>,
        /// Render as a regeneration with these change instructions.
        #[arg(long)]
        regenerate: Option<String>,
    },
    /// List the stories selected for an idea, with scores.
    Stories {
        /// Profile fixture file.
        #[arg(long)]
        fixture: PathBuf,
        /// User id.
        #[arg(long)]
        user: String,
        /// Idea id.
        #[arg(long)]
        idea: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

/// One ranked story in `stories` output.
#[derive(Serialize)]
struct RankedStory<'a> {
    id: &'a str,
    title: &'a str,
    score: i64,
    selected: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    let _logging_guard = init_logging(cli.log_dir.as_deref(), &config.logging)?;

    match cli.command {
        Command::Base {
            fixture,
            user,
            content_type,
        } => {
            let (assembler, _) = build_assembler(&config, &fixture).await?;
            let prompt = assembler
                .assemble_base(&user, &ContentType::parse(&content_type))
                .await?;
            println!("{prompt}");
            Ok(())
        }
        Command::Final {
            fixture,
            user,
            idea,
            content_type,
            regenerate,
        } => {
            let (assembler, source) = build_assembler(&config, &fixture).await?;
            let mut idea = find_idea(&source, &user, &idea).await?;
            if regenerate.is_some() {
                idea.regeneration_instructions = regenerate;
            }
            let content_type = content_type
                .map(|ct| ContentType::parse(&ct))
                .unwrap_or_else(|| idea.content_type.clone());
            let prompt = assembler
                .assemble_final_detailed(&user, &idea, &content_type)
                .await?;
            debug!(
                stories = ?prompt.selected_story_ids,
                estimated_tokens = prompt.estimated_tokens,
                "rendered final prompt"
            );
            println!("{}", prompt.text);
            Ok(())
        }
        Command::Stories {
            fixture,
            user,
            idea,
            json,
        } => handle_stories(&fixture, &user, &idea, json).await,
    }
}

fn init_logging(
    log_dir: Option<&Path>,
    config: &LoggingConfig,
) -> anyhow::Result<Option<LoggingGuard>> {
    match log_dir {
        Some(dir) => logging::init_file(dir, config).map(Some),
        None => {
            logging::init_cli(config);
            Ok(None)
        }
    }
}

async fn build_assembler(
    config: &Config,
    fixture: &Path,
) -> anyhow::Result<(PromptAssembler, Arc<InMemoryProfileSource>)> {
    let source = Arc::new(ProfileFixture::load(fixture)?.into_source().await);
    let shared: Arc<dyn ProfileSource> = source.clone();
    Ok((PromptAssembler::from_config(shared, config), source))
}

async fn find_idea(
    source: &InMemoryProfileSource,
    user: &str,
    idea_id: &str,
) -> anyhow::Result<ContentIdea> {
    source
        .find_idea(user, idea_id)
        .await
        .with_context(|| format!("idea {idea_id} not found for user {user}"))
}

/// Print every eligible story with its score; the top ones are marked.
async fn handle_stories(
    fixture: &Path,
    user: &str,
    idea_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let source = ProfileFixture::load(fixture)?.into_source().await;
    let idea = find_idea(&source, user, idea_id).await?;
    let stories = source.fetch_personal_stories(user).await?;
    let ranked = rank_stories(&stories, &idea, &idea.content_type, Utc::now());

    let rows: Vec<RankedStory<'_>> = ranked
        .iter()
        .enumerate()
        .map(|(i, (story, score))| RankedStory {
            id: &story.id,
            title: &story.title,
            score: *score,
            selected: i < MAX_SELECTED_STORIES,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("No eligible stories.");
    }
    for row in &rows {
        let marker = if row.selected { "*" } else { " " };
        println!("{marker} {:>4}  {}  {}", row.score, row.id, row.title);
    }
    Ok(())
}
