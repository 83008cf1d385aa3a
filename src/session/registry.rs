//! Session construction and the cached chat session.

use super::{DisabledSession, ModelSession, RpcModelSession};
use crate::transport::Transport;
use std::sync::{Arc, Mutex, PoisonError};

/// Model used when none is named
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// A session shared between the registry and its callers
pub type SharedSession = Arc<Mutex<Box<dyn ModelSession>>>;

/// Builds fresh sessions seeded with a system preamble.
pub trait SessionFactory: Send + Sync {
    fn create(&self, model: &str, system_prompt: &str) -> Box<dyn ModelSession>;
}

/// Factory for sessions that reach the model server.
pub struct RpcSessionFactory {
    transport: Arc<dyn Transport>,
    endpoint: String,
}

impl RpcSessionFactory {
    pub fn new(transport: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }
}

impl SessionFactory for RpcSessionFactory {
    fn create(&self, model: &str, system_prompt: &str) -> Box<dyn ModelSession> {
        Box::new(RpcModelSession::with_system_prompt(
            Arc::clone(&self.transport),
            self.endpoint.clone(),
            model,
            system_prompt,
        ))
    }
}

/// Factory for offline runs; every session it builds is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSessionFactory;

impl SessionFactory for OfflineSessionFactory {
    fn create(&self, model: &str, system_prompt: &str) -> Box<dyn ModelSession> {
        let mut session = DisabledSession::new(model);
        session.add_to_history(super::Role::System, system_prompt.to_string());
        Box::new(session)
    }
}

struct CachedSession {
    model: String,
    session: SharedSession,
}

/// Holds at most one chat session, keyed by model.
///
/// Asking for another model discards the cached session and its history.
/// The slot lock is held while a replacement is built, so concurrent callers
/// never build two sessions for one switch.
pub struct SessionRegistry {
    factory: Arc<dyn SessionFactory>,
    default_system_prompt: String,
    slot: Mutex<Option<CachedSession>>,
}

impl SessionRegistry {
    pub fn new(factory: Arc<dyn SessionFactory>, default_system_prompt: impl Into<String>) -> Self {
        Self {
            factory,
            default_system_prompt: default_system_prompt.into(),
            slot: Mutex::new(None),
        }
    }

    /// Cached session for `model`, building it if needed. An empty model
    /// name means [`DEFAULT_MODEL`].
    pub fn session_for(&self, model: &str) -> SharedSession {
        let model = if model.is_empty() {
            tracing::warn!("No model specified, defaulting to {}", DEFAULT_MODEL);
            DEFAULT_MODEL
        } else {
            model
        };

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = slot.as_ref() {
            if cached.model == model {
                return Arc::clone(&cached.session);
            }
        }

        tracing::info!("Creating new chat session for model {}", model);
        let session: SharedSession = Arc::new(Mutex::new(
            self.factory.create(model, &self.default_system_prompt),
        ));
        *slot = Some(CachedSession {
            model: model.to_string(),
            session: Arc::clone(&session),
        });
        session
    }

    /// Drop the cached session
    pub fn reset(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::info!("Chat session reset");
    }

    /// Factory used for every session this registry builds
    #[must_use]
    pub fn factory(&self) -> Arc<dyn SessionFactory> {
        Arc::clone(&self.factory)
    }
}
