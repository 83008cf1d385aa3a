//! Scripted session for unit tests.

use super::{ConversationHistory, ModelSession, Role, SessionError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Answers from a script and records every prompt it receives.
pub struct ScriptedSession {
    replies: VecDeque<Result<String, SessionError>>,
    prompts: Arc<Mutex<Vec<String>>>,
    history: ConversationHistory,
}

impl ScriptedSession {
    /// Session plus a handle on the prompts it will record
    pub fn new(replies: Vec<Result<String, SessionError>>) -> (Self, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let session = Self {
            replies: replies.into(),
            prompts: Arc::clone(&prompts),
            history: ConversationHistory::new(),
        };
        (session, prompts)
    }

    /// Session answering every prompt with the given texts, in order
    pub fn answering(replies: &[&str]) -> (Self, Arc<Mutex<Vec<String>>>) {
        Self::new(replies.iter().map(|r| Ok((*r).to_string())).collect())
    }
}

impl ModelSession for ScriptedSession {
    fn submit_prompt(&mut self, prompt: &str) -> Result<String, SessionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self
            .replies
            .pop_front()
            .unwrap_or(Err(SessionError::MissingResult))?;
        self.history.push(Role::User, prompt);
        self.history.push(Role::Assistant, reply.clone());
        Ok(reply)
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
        "scripted"
    }
}
