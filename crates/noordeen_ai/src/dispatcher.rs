//! Response dispatcher: mode selection, provider call, and fallback normalization

use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::{get_message, get_system_prompt, Language, Mode};
use crate::error::{DispatchError, ProviderError, Result};
use crate::model::{GenerationRequest, ModelClient, ModelConfig, TextProvider};

/// Maximum length of the optional diagnostic suffix, in characters
const DIAGNOSTIC_MAX_CHARS: usize = 80;

/// Builds the provider on first use
pub type ProviderFactory = Box<dyn Fn() -> Arc<dyn TextProvider> + Send + Sync>;

/// Turns a user query into a single provider request and normalizes the outcome
///
/// The provider is created lazily through the injected factory the first time
/// a query is dispatched and reused for every later call on this dispatcher.
/// `dispatch` never fails: every error path ends in one of the two localized
/// fallback messages.
pub struct Dispatcher {
    factory: ProviderFactory,
    provider: OnceLock<Arc<dyn TextProvider>>,
    lang: Language,
    timeout: Option<Duration>,
    diagnostics: bool,
}

impl Dispatcher {
    /// Create a dispatcher around a provider factory
    pub fn new<F, P>(factory: F) -> Self
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: TextProvider + 'static,
    {
        Self {
            factory: Box::new(move || Arc::new(factory()) as Arc<dyn TextProvider>),
            provider: OnceLock::new(),
            lang: Language::default(),
            timeout: None,
            diagnostics: false,
        }
    }

    /// Create a dispatcher whose provider reads `ModelConfig::from_env()` on first use
    pub fn from_env() -> Self {
        Self::new(|| ModelClient::new(ModelConfig::from_env()))
    }

    /// Set the language of the fallback messages
    pub fn with_lang(mut self, lang: Language) -> Self {
        self.lang = lang;
        self
    }

    /// Bound each provider call; expiry is reported as a provider failure
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Append a short error description to the failure fallback
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    /// Whether the provider has been created yet
    pub fn is_initialized(&self) -> bool {
        self.provider.get().is_some()
    }

    /// Get the shared provider, creating it if needed
    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        self.provider.get_or_init(|| {
            debug!("initializing text provider");
            (self.factory)()
        })
    }

    /// Dispatch a query and return the answer or a localized fallback message
    pub async fn dispatch(&self, query: &str, mode: Mode) -> String {
        match self.try_dispatch(query, mode).await {
            Ok(text) => text,
            Err(err) => self.fallback_for(&err),
        }
    }

    /// Same as `dispatch`, with the mode given by name
    ///
    /// Unrecognized names use `Mode::Detailed`.
    pub async fn dispatch_str(&self, query: &str, mode: &str) -> String {
        self.dispatch(query, Mode::from_name(mode)).await
    }

    /// Dispatch a query, keeping the failure kind inspectable
    pub async fn try_dispatch(&self, query: &str, mode: Mode) -> Result<String> {
        let result = self.request(query, mode).await;

        match &result {
            Ok(_) => {}
            Err(DispatchError::NoAnswer) => warn!(%mode, "provider returned no text"),
            Err(DispatchError::Provider(e)) => error!(%mode, error = %e, "provider request failed"),
        }

        result
    }

    async fn request(&self, query: &str, mode: Mode) -> Result<String> {
        let request = GenerationRequest::new(get_system_prompt(mode), query);
        let provider = self.provider();

        debug!(
            %mode,
            model = provider.model_id(),
            query_chars = query.chars().count(),
            "dispatching query"
        );

        let generated = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, provider.generate(&request))
                .await
                .map_err(|_| ProviderError::Timeout(limit))?,
            None => provider.generate(&request).await,
        }?;

        match generated {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(DispatchError::NoAnswer),
        }
    }

    /// Localized message shown in place of an answer
    pub fn fallback_for(&self, err: &DispatchError) -> String {
        let message = fallback_message(err, self.lang);
        match err {
            DispatchError::Provider(e) if self.diagnostics => {
                format!("{} ({})", message, diagnostic_suffix(e))
            }
            _ => message.to_string(),
        }
    }
}

/// Map a dispatch failure to its fixed localized message
pub fn fallback_message(err: &DispatchError, lang: Language) -> &'static str {
    let key = match err {
        DispatchError::NoAnswer => "no_answer",
        DispatchError::Provider(_) => "error_retry",
    };
    get_message(key, lang)
}

fn diagnostic_suffix(err: &ProviderError) -> String {
    let text = err.to_string();
    let first_line = text.lines().next().unwrap_or_default().trim();
    if first_line.chars().count() <= DIAGNOSTIC_MAX_CHARS {
        return first_line.to_string();
    }
    let mut short: String = first_line.chars().take(DIAGNOSTIC_MAX_CHARS).collect();
    short.push('…');
    short
}
