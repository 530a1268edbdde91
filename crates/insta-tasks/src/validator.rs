//! Task and result validation
//!
//! Intentionally shallow: the checks gate obviously malformed input while
//! deeper schema validation waits on the handler contracts.

use serde_json::Value;

use crate::task::Task;

/// Shallow task/result validator
#[derive(Debug, Default)]
pub struct TaskValidator;

impl TaskValidator {
    pub fn new() -> Self {
        Self
    }

    /// A task passes when it carries a non-empty payload
    pub fn validate_task(&self, task: &Task) -> bool {
        !task.payload().is_empty()
    }

    /// A result passes when it is a JSON object
    pub fn validate_result(&self, _task: &Task, result: &Value) -> bool {
        result.is_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_fails() {
        let validator = TaskValidator::new();
        assert!(!validator.validate_task(&Task::default()));
    }

    #[test]
    fn test_non_empty_payload_passes() {
        let validator = TaskValidator::new();
        let task: Task = serde_json::from_value(serde_json::json!({ "type": "api" })).unwrap();
        assert!(validator.validate_task(&task));
    }

    #[test]
    fn test_result_must_be_an_object() {
        let validator = TaskValidator::new();
        let task: Task = serde_json::from_value(serde_json::json!({ "type": "api" })).unwrap();

        assert!(validator.validate_result(&task, &serde_json::json!({ "status": "done" })));
        assert!(!validator.validate_result(&task, &serde_json::json!("done")));
        assert!(!validator.validate_result(&task, &serde_json::Value::Null));
    }
}
