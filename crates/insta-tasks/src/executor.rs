//! Task executor
//!
//! Three stages, no persisted state: validate, dispatch, validate-result.

use serde_json::Value;
use tracing::{debug, error};

use crate::error::{Result, TaskError};
use crate::task::Task;
use crate::validator::TaskValidator;

/// Executes tasks after validation
pub struct TaskExecutor {
    validator: TaskValidator,
}

impl TaskExecutor {
    /// Create a new executor
    pub fn new() -> Self {
        Self {
            validator: TaskValidator::new(),
        }
    }

    /// Execute a task: validate, dispatch by declared type, validate the
    /// handler's result.
    ///
    /// An unrecognized type fails with [`TaskError::Unsupported`]; any
    /// handler failure is wrapped as [`TaskError::Execution`] carrying the
    /// original message.
    pub async fn execute(&self, task: &Task) -> Result<Value> {
        if !self.validator.validate_task(task) {
            return Err(TaskError::Validation);
        }

        let result = self.process(task).await.map_err(|e| {
            error!("Task execution failed: {}", e);
            e
        })?;

        if !self.validator.validate_result(task, &result) {
            return Err(TaskError::ResultValidation);
        }

        Ok(result)
    }

    /// Dispatch a task to its handler by declared type
    async fn process(&self, task: &Task) -> Result<Value> {
        let result = match task.task_type() {
            Some("browser") => self.handle_browser_task(task).await,
            Some("api") => self.handle_api_task(task).await,
            other => {
                return Err(TaskError::Unsupported(
                    other.unwrap_or("<missing>").to_string(),
                ))
            }
        };

        result.map_err(|e| TaskError::Execution(e.to_string()))
    }

    /// Browser automation handler (pending implementation)
    async fn handle_browser_task(&self, task: &Task) -> Result<Value> {
        debug!("Browser task received: {:?}", task.payload());
        Err(TaskError::NotImplemented("Browser automation"))
    }

    /// API call handler (pending implementation)
    async fn handle_api_task(&self, task: &Task) -> Result<Value> {
        debug!("API task received: {:?}", task.payload());
        Err(TaskError::NotImplemented("API call"))
    }
}

impl Default for TaskExecutor {
    fn default() -> Self {
        Self::new()
    }
}
