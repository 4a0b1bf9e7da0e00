//! LLM advisory
//!
//! Business insight from a language model. Disabled (static fallback text)
//! when no model is configured.

pub mod model;
pub mod prompts;
pub mod service;

pub use model::{GeminiModel, LanguageModel};
pub use service::{AdvisoryService, Suggestion, parse_name_message};
