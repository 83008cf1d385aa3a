//! Session backed by the model-server transport.

use super::{ConversationHistory, ModelSession, Role, SessionError};
use crate::transport::{RpcRequest, Transport, TransportError, PROMPT_MODEL};
use serde_json::Value;
use std::sync::Arc;

/// Conversation with one model through the `promptModel` remote call.
pub struct RpcModelSession {
    transport: Arc<dyn Transport>,
    endpoint: String,
    model: String,
    history: ConversationHistory,
}

impl RpcModelSession {
    /// Session with an empty history
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            model: model.into(),
            history: ConversationHistory::new(),
        }
    }

    /// Session whose history starts with a system preamble
    pub fn with_system_prompt(
        transport: Arc<dyn Transport>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        let mut session = Self::new(transport, endpoint, model);
        session.add_to_history(Role::System, system_prompt.into());
        session
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for RpcModelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcModelSession")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl ModelSession for RpcModelSession {
    fn submit_prompt(&mut self, prompt: &str) -> Result<String, SessionError> {
        // The new prompt travels as its own argument; history holds prior turns only.
        let history = self.history.to_value().map_err(TransportError::Encode)?;
        let request = RpcRequest::new(
            PROMPT_MODEL,
            vec![
                Value::String(self.endpoint.clone()),
                Value::String(self.model.clone()),
                Value::String(prompt.to_string()),
                history,
            ],
        );

        let reply = self.transport.exchange(&request)?;
        let result = reply.result_str().ok_or(SessionError::MissingResult)?;

        self.history.push(Role::User, prompt);
        self.history.push(Role::Assistant, result.clone());
        Ok(result)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{RpcReply, TransportError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        reply: Option<RpcReply>,
        requests: Mutex<Vec<RpcRequest>>,
    }

    impl Transport for Recording {
        fn exchange(&self, request: &RpcRequest) -> Result<RpcReply, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            self.reply.clone().ok_or(TransportError::EndOfStream)
        }
    }

    #[test]
    fn test_success_appends_two_turns() {
        let transport = Arc::new(Recording {
            reply: Some(RpcReply::with_result("R")),
            ..Recording::default()
        });
        let mut session =
            RpcModelSession::with_system_prompt(transport.clone(), "localhost", "gpt-4o", "sys");

        assert_eq!(session.submit_prompt("p").unwrap(), "R");
        let messages = session.history().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "p");
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "R");
    }

    #[test]
    fn test_request_carries_prior_history_only() {
        let transport = Arc::new(Recording {
            reply: Some(RpcReply::with_result("R")),
            ..Recording::default()
        });
        let mut session =
            RpcModelSession::with_system_prompt(transport.clone(), "localhost", "gpt-4o", "sys");
        session.submit_prompt("p").unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].function, "promptModel");
        assert_eq!(
            requests[0].args,
            vec![
                serde_json::json!("localhost"),
                serde_json::json!("gpt-4o"),
                serde_json::json!("p"),
                serde_json::json!([{"role": "system", "content": "sys"}]),
            ]
        );
    }

    #[test]
    fn test_failure_leaves_history_unchanged() {
        let transport = Arc::new(Recording::default());
        let mut session = RpcModelSession::new(transport, "localhost", "gpt-4o");
        assert!(matches!(
            session.submit_prompt("p"),
            Err(SessionError::TransportFailed(_))
        ));
        assert_eq!(session.submit_prompt_or_empty("p"), "");
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_missing_result_leaves_history_unchanged() {
        let transport = Arc::new(Recording {
            reply: Some(RpcReply::from_line(r#"{"result":null}"#).unwrap()),
            ..Recording::default()
        });
        let mut session = RpcModelSession::new(transport, "localhost", "gpt-4o");
        assert!(matches!(
            session.submit_prompt("p"),
            Err(SessionError::MissingResult)
        ));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_clear_history_keeps_identity() {
        let transport = Arc::new(Recording::default());
        let mut session =
            RpcModelSession::with_system_prompt(transport, "localhost", "gpt-4o", "sys");
        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(session.model(), "gpt-4o");
        assert_eq!(session.endpoint(), "localhost");
    }
}
