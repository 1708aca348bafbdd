//! Configuration module for noordeen_ai
//!
//! This module contains:
//! - `i18n`: Localized fallback and UI messages
//! - `prompts`: Response modes and system instructions

mod i18n;
mod prompts;

pub use i18n::{get_message, get_messages, Language, MESSAGES_BN, MESSAGES_EN};
pub use prompts::{get_system_prompt, Mode};
