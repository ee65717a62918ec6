//! Thin HTTP clients for the supported LLM backends.
//!
//! Each provider is a small typed wrapper over one endpoint; no retries,
//! no streaming.

pub mod lmstudio;
pub mod ollama;
pub mod openai;

pub use lmstudio::LmStudioProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
