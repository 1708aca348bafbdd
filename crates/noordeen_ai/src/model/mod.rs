//! Model client module for text generation
//!
//! This module provides:
//! - `provider`: The `TextProvider` seam and single-turn request type
//! - `client`: OpenAI-compatible model client

mod client;
mod provider;

pub use client::{
    MessageBuilder, ModelClient, ModelConfig, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use provider::{GenerationRequest, TextProvider};
