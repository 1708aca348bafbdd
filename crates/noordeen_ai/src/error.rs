//! Error types for the dispatcher and its provider

use std::time::Duration;

use async_openai::error::OpenAIError;
use thiserror::Error;

/// Failures raised while talking to the text-generation provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Request(#[from] OpenAIError),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Outcome kinds that replace a successful answer
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The provider answered but produced no usable text
    #[error("Provider returned no usable text")]
    NoAnswer,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl DispatchError {
    pub fn is_no_answer(&self) -> bool {
        matches!(self, Self::NoAnswer)
    }
}

/// Errors raised by the chat caller layer before anything is dispatched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Query is empty")]
    EmptyQuery,
}

pub type Result<T> = std::result::Result<T, DispatchError>;
