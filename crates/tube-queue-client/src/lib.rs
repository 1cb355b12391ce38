//! Typed client for a remote task queue.
//!
//! A [`Queue`] is bound to one tube and turns each operation into a call of
//! the form `queue.tube.<name>:<operation>` on a [`Transport`]. All queue
//! state lives on the server; the client only shapes requests and decodes
//! replies.

mod blocking;
mod config;
mod queue;

pub use blocking::BlockingQueue;
pub use config::{ConfiguredQueue, QueueConfig};
pub use queue::Queue;

pub use tube_queue_core::{DecodeError, Options, Task, TaskId, TaskOptions, TaskStatus, Tuple, Value};
pub use tube_queue_transport::{BlockingAdapter, BlockingDriver, Driver, Transport, TransportError};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Construction error: {0}")]
    ConstructionError(String),

    #[error("Decode error: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    TransportError(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, QueueError>;
