//! Provider abstraction used by the dispatcher

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ProviderError;

/// A single-turn generation request
///
/// Carries no conversation history: every request is stateless from the
/// provider's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_instruction: &'static str,
    pub user_content: String,
}

impl GenerationRequest {
    pub fn new(system_instruction: &'static str, user_content: impl Into<String>) -> Self {
        Self {
            system_instruction,
            user_content: user_content.into(),
        }
    }
}

/// External text-generation service
///
/// Implementations are shared across concurrent dispatches and must not keep
/// per-call mutable state.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Model identifier sent with every request
    fn model_id(&self) -> &str;

    /// Issue one request. `Ok(None)` means the provider answered without text.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<String>, ProviderError>;
}

#[async_trait]
impl<T: TextProvider + ?Sized> TextProvider for Arc<T> {
    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<String>, ProviderError> {
        (**self).generate(request).await
    }
}
