//! insta-tasks: generic task execution contract for insta-gateway
//!
//! Validate, dispatch by declared type, validate the result. The two
//! concrete handlers (`browser`, `api`) are pending implementation; until
//! requirements define them, executing those task types fails with an
//! execution error wrapping the not-implemented message.

pub mod error;
pub mod executor;
pub mod task;
pub mod validator;

pub use error::{Result, TaskError};
pub use executor::TaskExecutor;
pub use task::Task;
pub use validator::TaskValidator;
