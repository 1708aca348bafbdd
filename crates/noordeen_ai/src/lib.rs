//! noordeen_ai: conversational query dispatcher for the NoorDeen assistant
//!
//! This library provides:
//! - Response modes (concise, detailed, scholarly) with fixed system instructions
//! - A dispatcher that sends one single-turn request per query and normalizes
//!   every failure into a localized fallback message
//! - An OpenAI-compatible model client targeting Gemini
//! - A chat session that validates input and tracks failure streaks
//!
//! # Example
//!
//! ```no_run
//! use noordeen_ai::{Dispatcher, Language, Mode};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dispatcher = Dispatcher::from_env().with_lang(Language::Bangla);
//!
//!     let answer = dispatcher.dispatch("নামাজের গুরুত্ব কী?", Mode::Concise).await;
//!     println!("{}", answer);
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Core functionality
pub mod chat;
pub mod dispatcher;
pub mod model;

// Re-export commonly used types and functions
pub use error::{ChatError, DispatchError, ProviderError, Result};

// Config re-exports
pub use config::{
    get_message, get_messages, get_system_prompt, Language, Mode, MESSAGES_BN, MESSAGES_EN,
};

// Model re-exports
pub use model::{
    GenerationRequest, MessageBuilder, ModelClient, ModelConfig, TextProvider, API_KEY_ENV,
    DEFAULT_BASE_URL, DEFAULT_MODEL,
};

// Dispatcher re-exports
pub use dispatcher::{fallback_message, Dispatcher, ProviderFactory};

// Chat re-exports
pub use chat::{ChatSession, ChatTurn, TurnOutcome};
