//! Model sessions.
//!
//! A session is one conversation with one model: an ordered history plus the
//! call that turns a prompt into a reply. [`RpcModelSession`] talks to the
//! model server; [`DisabledSession`] stands in when analysis runs offline.
//! Sessions are created through a [`SessionFactory`], and the user-facing chat
//! session is cached in a [`SessionRegistry`].

mod history;
mod prompts;
mod registry;
mod rpc;
#[cfg(test)]
pub(crate) mod testing;

pub use history::{ChatMessage, ConversationHistory, Role};
pub use prompts::{ChangeReportFields, PromptTemplates, TemplateName};
pub use registry::{
    OfflineSessionFactory, RpcSessionFactory, SessionFactory, SessionRegistry, SharedSession,
    DEFAULT_MODEL,
};
pub use rpc::RpcModelSession;

use crate::transport::TransportError;
use thiserror::Error;

/// Why a prompt produced no reply
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SessionError {
    /// The transport could not complete the call
    #[error("Model call failed: {0}")]
    TransportFailed(#[from] TransportError),

    /// The reply had no usable `result` field
    #[error("Model reply carried no result")]
    MissingResult,

    /// The session never talks to a model
    #[error("Model access is disabled")]
    Disabled,
}

/// Capability shared by every session kind.
///
/// A session is not meant for concurrent prompting; share it behind a mutex.
pub trait ModelSession: Send {
    /// Send a prompt with the prior history.
    ///
    /// On success the history gains the user turn then the assistant turn.
    /// On failure the history is unchanged.
    fn submit_prompt(&mut self, prompt: &str) -> Result<String, SessionError>;

    /// Like [`submit_prompt`](Self::submit_prompt), with failures logged and
    /// reported as an empty reply.
    fn submit_prompt_or_empty(&mut self, prompt: &str) -> String {
        self.submit_prompt(prompt).unwrap_or_else(|err| {
            tracing::warn!("Prompt to {} failed: {}", self.model(), err);
            String::new()
        })
    }

    /// Drop every turn, keeping endpoint and model
    fn clear_history(&mut self);

    /// Append a turn directly
    fn add_to_history(&mut self, role: Role, content: String);

    fn history(&self) -> &ConversationHistory;

    /// Model identifier
    fn model(&self) -> &str;
}

/// Session used when model access is switched off.
#[derive(Debug, Clone, Default)]
pub struct DisabledSession {
    model: String,
    history: ConversationHistory,
}

impl DisabledSession {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            history: ConversationHistory::new(),
        }
    }
}

impl ModelSession for DisabledSession {
    fn submit_prompt(&mut self, _prompt: &str) -> Result<String, SessionError> {
        Err(SessionError::Disabled)
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }

    fn add_to_history(&mut self, role: Role, content: String) {
        self.history.push(role, content);
    }

    fn history(&self) -> &ConversationHistory {
        &self.history
    }

    fn model(&self) -> &str {
        &self.model
    }
}
