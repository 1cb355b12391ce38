mod task;
mod options;
mod error;

pub use task::{Task, TaskId, TaskStatus, Tuple};
pub use options::{Options, TaskOptions};
pub use error::{DecodeError, Result};

pub use serde_json::Value;

/// Number of leading tuple fields that make up a task: id, status, data
pub const TASK_TUPLE_LEN: usize = 3;
