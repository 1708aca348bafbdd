//! Chat session: the caller layer in front of the dispatcher

use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Mode;
use crate::dispatcher::Dispatcher;
use crate::error::{ChatError, DispatchError};

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Answered,
    NoAnswer,
    Failed,
}

impl TurnOutcome {
    fn from_error(err: &DispatchError) -> Self {
        match err {
            DispatchError::NoAnswer => Self::NoAnswer,
            DispatchError::Provider(_) => Self::Failed,
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Answered)
    }
}

/// One question and the text shown for it
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub query: String,
    pub mode: Mode,
    pub reply: String,
    pub outcome: TurnOutcome,
    pub at: DateTime<Local>,
}

/// A local conversation with the assistant
///
/// The transcript exists only for display. Every submission is dispatched on
/// its own; earlier turns are never sent to the provider.
pub struct ChatSession {
    dispatcher: Arc<Dispatcher>,
    mode: Mode,
    transcript: Vec<ChatTurn>,
    consecutive_fallbacks: usize,
}

impl ChatSession {
    /// Create a new session in the default mode
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            mode: Mode::default(),
            transcript: Vec::new(),
            consecutive_fallbacks: 0,
        }
    }

    /// Set the initial response mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        debug!(from = %self.mode, to = %mode, "switching response mode");
        self.mode = mode;
    }

    /// Submit user input
    ///
    /// Blank input is rejected before reaching the dispatcher. Provider
    /// failures are not errors here: they are recorded as fallback turns.
    pub async fn submit(&mut self, input: &str) -> Result<&ChatTurn, ChatError> {
        let query = input.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyQuery);
        }

        let (reply, outcome) = match self.dispatcher.try_dispatch(query, self.mode).await {
            Ok(text) => (text, TurnOutcome::Answered),
            Err(err) => (
                self.dispatcher.fallback_for(&err),
                TurnOutcome::from_error(&err),
            ),
        };

        if outcome.is_fallback() {
            self.consecutive_fallbacks += 1;
            info!(
                consecutive = self.consecutive_fallbacks,
                ?outcome,
                "turn ended with a fallback message"
            );
        } else {
            self.consecutive_fallbacks = 0;
        }

        let index = self.transcript.len();
        self.transcript.push(ChatTurn {
            query: query.to_string(),
            mode: self.mode,
            reply,
            outcome,
            at: Local::now(),
        });

        Ok(&self.transcript[index])
    }

    /// Number of trailing turns that ended with a fallback message
    pub fn consecutive_fallbacks(&self) -> usize {
        self.consecutive_fallbacks
    }

    /// Whether a persistent-failure warning should be shown
    pub fn should_warn(&self, threshold: usize) -> bool {
        threshold > 0 && self.consecutive_fallbacks >= threshold
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Clear the transcript and the failure streak
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.consecutive_fallbacks = 0;
    }
}
