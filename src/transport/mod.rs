//! Line-delimited JSON transport to the model-serving process.
//!
//! Every call opens a fresh connection, writes one request line, reads one
//! reply line and closes the connection. Failures never escape
//! [`Transport::call`]: they are logged and turned into an empty reply.
//! Sessions that need to tell failure kinds apart use [`Transport::exchange`].

mod envelope;
mod socket;

pub use envelope::{RpcReply, RpcRequest, PROMPT_MODEL};
pub use socket::{SocketTransport, TransportConfig};

use serde_json::Value;
use thiserror::Error;

/// Why a call produced no reply
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    #[error("Unable to connect to model server at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out while {phase}")]
    Timeout { phase: &'static str },

    #[error("I/O error talking to model server: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    #[error("Connection closed before a reply was received")]
    EndOfStream,

    #[error("Unable to resolve model server address {0}")]
    AddressResolution(String),
}

/// Synchronous request/response channel.
pub trait Transport: Send + Sync {
    /// Perform one call, reporting why it failed.
    fn exchange(&self, request: &RpcRequest) -> Result<RpcReply, TransportError>;

    /// Perform one call, degrading every failure to an empty reply.
    fn call(&self, function: &str, args: Vec<Value>) -> RpcReply {
        let request = RpcRequest::new(function, args);
        match self.exchange(&request) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!("Model server call {:?} failed: {}", function, err);
                RpcReply::empty()
            }
        }
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn exchange(&self, request: &RpcRequest) -> Result<RpcReply, TransportError> {
        (**self).exchange(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl Transport for Failing {
        fn exchange(&self, _request: &RpcRequest) -> Result<RpcReply, TransportError> {
            Err(TransportError::EndOfStream)
        }
    }

    #[test]
    fn test_call_degrades_to_empty_reply() {
        let reply = Failing.call(PROMPT_MODEL, vec![]);
        assert!(reply.is_empty());
    }
}
