//! Task model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single unit of work submitted to the executor.
///
/// The payload is an arbitrary JSON object whose `type` field selects the
/// handler. Tasks are consumed once and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    payload: serde_json::Map<String, Value>,
}

impl Task {
    /// Create a task from a payload object
    pub fn new(payload: serde_json::Map<String, Value>) -> Self {
        Self { payload }
    }

    /// The raw payload
    pub fn payload(&self) -> &serde_json::Map<String, Value> {
        &self.payload
    }

    /// The declared task type, if any
    pub fn task_type(&self) -> Option<&str> {
        self.payload.get("type").and_then(Value::as_str)
    }
}
