use crate::error::kind_of;
use crate::{DecodeError, Result, TASK_TUPLE_LEN};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned task identifier
pub type TaskId = u64;

/// Ordered, positional sequence of values exchanged with the server
pub type Tuple = Vec<Value>;

/// Task states as labelled by the queue server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Waiting to be taken by a consumer
    Ready,
    /// Taken by a consumer, not yet acknowledged
    Taken,
    /// Acknowledged
    Done,
    /// Moved aside until kicked
    Buried,
    /// Scheduled to become ready later
    Delayed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Ready,
        TaskStatus::Taken,
        TaskStatus::Done,
        TaskStatus::Buried,
        TaskStatus::Delayed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Ready => "r",
            TaskStatus::Taken => "t",
            TaskStatus::Done => "-",
            TaskStatus::Buried => "!",
            TaskStatus::Delayed => "~",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "r" => Some(TaskStatus::Ready),
            "t" => Some(TaskStatus::Taken),
            "-" => Some(TaskStatus::Done),
            "!" => Some(TaskStatus::Buried),
            "~" => Some(TaskStatus::Delayed),
            _ => None,
        }
    }
}

/// One unit of queued work as reported by the server.
///
/// A `Task` is a snapshot: it is decoded from a reply tuple and never
/// updated afterwards. Operations on the queue return fresh snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    status: String,
    data: Value,
}

impl Task {
    /// Decode a task from the positional tuple `[id, status, data, ...]`.
    ///
    /// Trailing fields beyond the first three are ignored.
    pub fn from_tuple(tuple: &[Value]) -> Result<Self> {
        if tuple.len() < TASK_TUPLE_LEN {
            return Err(DecodeError::TupleTooShort {
                expected: TASK_TUPLE_LEN,
                actual: tuple.len(),
            });
        }

        let id = tuple[0].as_u64().ok_or(DecodeError::InvalidField {
            field: "id",
            expected: "unsigned integer",
            actual: kind_of(&tuple[0]),
        })?;

        let status = tuple[1].as_str().ok_or(DecodeError::InvalidField {
            field: "status",
            expected: "string",
            actual: kind_of(&tuple[1]),
        })?;

        Ok(Task {
            id,
            status: status.to_owned(),
            data: tuple[2].clone(),
        })
    }

    /// Decode a task from a tuple nested inside a reply
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Array(tuple) => Self::from_tuple(tuple),
            other => Err(DecodeError::NotATuple(kind_of(other))),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Raw status label, exactly as sent by the server
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// Deserialize the payload into a caller-defined type
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.data).map_err(|e| DecodeError::Payload(e.to_string()))
    }

    /// Parsed status, or `None` for labels this client does not know
    pub fn state(&self) -> Option<TaskStatus> {
        TaskStatus::from_str(&self.status)
    }

    pub fn is_ready(&self) -> bool {
        self.state() == Some(TaskStatus::Ready)
    }

    pub fn is_taken(&self) -> bool {
        self.state() == Some(TaskStatus::Taken)
    }

    pub fn is_done(&self) -> bool {
        self.state() == Some(TaskStatus::Done)
    }

    pub fn is_buried(&self) -> bool {
        self.state() == Some(TaskStatus::Buried)
    }

    pub fn is_delayed(&self) -> bool {
        self.state() == Some(TaskStatus::Delayed)
    }
}

impl TryFrom<&[Value]> for Task {
    type Error = DecodeError;

    fn try_from(tuple: &[Value]) -> Result<Self> {
        Task::from_tuple(tuple)
    }
}
