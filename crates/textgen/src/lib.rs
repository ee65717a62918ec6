//! Content generation bridge for the feed simulation.
//!
//! The engine talks to exactly one abstraction, [`TextGenerator`]: produce
//! text given a prompt. This crate supplies the prompt builders that turn
//! simulation state into prompts, the parsers and sanitizer that turn raw
//! generator output back into entities, the instruction-injection registry,
//! and the provider implementations (OpenAI-compatible, Ollama, LM Studio,
//! plus an offline template provider).

pub mod generate;
pub mod instructions;
pub mod parse;
pub mod prompts;
pub mod provider;
pub mod providers;
pub mod sanitize;
pub mod template;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export provider types
pub use provider::{GenerateError, Generator, GeneratorConfig, ProviderKind, TextGenerator};

// Re-export generators
pub use generate::{
    generate_event, generate_post, generate_region, generate_reply, generate_tags, generate_user,
    generate_vote, UserDraw, VoteOutcome,
};

// Re-export instruction registry
pub use instructions::InstructionLibrary;

// Re-export sanitizer
pub use sanitize::clean_generated_content;

// Re-export offline provider
pub use template::TemplateGenerator;
