use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Task tuple too short: expected at least {expected} elements, got {actual}")]
    TupleTooShort { expected: usize, actual: usize },

    #[error("Invalid task field `{field}`: expected {expected}, got {actual}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Expected a tuple, got {0}")]
    NotATuple(&'static str),

    #[error("Empty reply from {0}")]
    EmptyReply(String),

    #[error("Payload error: {0}")]
    Payload(String),
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Short name of a value's type, used in decode error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_u64() => "unsigned integer",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}
