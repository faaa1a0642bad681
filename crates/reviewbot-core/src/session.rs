//! Conversation state and its two transitions
//!
//! `submit` moves the session from `Idle` to `Pending` and hands back the
//! text to classify; `settle` moves it back to `Idle` and appends the one
//! reply that request earns. No I/O happens here.

use crate::error::{ClassifyError, SessionError};
use crate::gateway::Classification;
use crate::message::Message;
use crate::verdict::Verdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RequestState {
    #[default]
    Idle,
    Pending,
}

/// Result of a submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A user message was appended; this text must be classified
    Dispatched(String),
    /// Draft was empty or whitespace; nothing changed
    Blank,
    /// A request is already in flight; nothing changed
    Busy,
}

#[derive(Debug, Clone)]
pub struct Session {
    messages: Vec<Message>,
    draft: String,
    request: RequestState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::greeting()],
            draft: String::new(),
            request: RequestState::Idle,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Editable draft; allowed while a request is pending
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn is_awaiting(&self) -> bool {
        self.request == RequestState::Pending
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if self.draft.trim().is_empty() {
            return SubmitOutcome::Blank;
        }
        if self.request == RequestState::Pending {
            return SubmitOutcome::Busy;
        }

        // The raw draft is stored and sent; trimming only decides emptiness.
        let text = std::mem::take(&mut self.draft);
        self.messages.push(Message::user(text.clone()));
        self.request = RequestState::Pending;
        SubmitOutcome::Dispatched(text)
    }

    pub fn settle(
        &mut self,
        outcome: Result<Classification, ClassifyError>,
    ) -> Result<(), SessionError> {
        if self.request != RequestState::Pending {
            return Err(SessionError::NotPending);
        }

        let reply = match outcome {
            Ok(result) => Message::verdict(Verdict::from_classification(&result)),
            Err(err) => {
                tracing::warn!(error = %err, "classification failed");
                Message::connection_failure()
            }
        };
        self.messages.push(reply);
        self.request = RequestState::Idle;
        Ok(())
    }
}
