//! Request and reply envelopes of the line protocol.
//!
//! A request is one JSON object `{"function": name, "args": [...]}` followed by
//! a newline. The reply is one JSON object on one line, normally
//! `{"result": ...}`. `serde_json` escapes embedded newlines inside string
//! values, so an encoded request never spans more than one line.

use super::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Remote operation that prompts a model
pub const PROMPT_MODEL: &str = "promptModel";

/// One call to the model server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub function: String,
    pub args: Vec<Value>,
}

impl RpcRequest {
    /// Create a request for a named remote function
    pub fn new(function: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            function: function.into(),
            args,
        }
    }

    /// Encode as a single newline-terminated line.
    pub fn to_line(&self) -> Result<String, TransportError> {
        let mut line = serde_json::to_string(self).map_err(TransportError::Encode)?;
        line.push('\n');
        Ok(line)
    }
}

/// Reply object from the model server. The empty reply stands for any failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RpcReply(Map<String, Value>);

impl RpcReply {
    /// The empty reply
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reply carrying a result value
    #[must_use]
    pub fn with_result(result: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("result".to_string(), result.into());
        Self(fields)
    }

    /// Decode one reply line. Anything but a JSON object is malformed.
    pub fn from_line(line: &str) -> Result<Self, TransportError> {
        match serde_json::from_str::<Value>(line.trim_end_matches(['\r', '\n'])) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(other) => Err(TransportError::MalformedReply(format!(
                "expected a JSON object, got {}",
                value_kind(&other)
            ))),
            Err(err) => Err(TransportError::MalformedReply(err.to_string())),
        }
    }

    /// Whether the reply has no fields at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw `result` field
    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        self.0.get("result")
    }

    /// `result` as text.
    ///
    /// Absent and `null` both yield `None`. Numbers and booleans are rendered
    /// as their JSON text; arrays and objects are not a usable result.
    #[must_use]
    pub fn result_str(&self) -> Option<String> {
        match self.result()? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
