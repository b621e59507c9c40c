pub mod llm_service;

pub use llm_service::{decode_structured, generate, ChatBackend, LlmService};
