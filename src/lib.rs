//! Pillarpost: prompt assembly for profile-driven content generation.
//!
//! Gathers a user's business context, content pillars, target audiences,
//! writing-style guides, prior examples and personal stories, and linearises
//! them into a single prompt for a text-generation model.
//!
//! Entry points live on [`prompt::assembler::PromptAssembler`]; data comes in
//! through [`profile::source::ProfileSource`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub mod profile;
pub mod prompt;
