//! The remote call capability the queue client is built on.
//!
//! Everything the client knows about the server goes through
//! [`Transport::call`]: a method name, positional arguments, and an ordered
//! reply tuple. Wire format, pooling and reconnection belong to whatever
//! implements the trait.

mod driver;
mod legacy;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use driver::Driver;
pub use legacy::{BlockingAdapter, BlockingDriver};
pub use tube_queue_core::Tuple;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Server error: {message}")]
    ServerError { code: Option<u32>, message: String },

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TransportError {
    pub fn server(message: impl Into<String>) -> Self {
        TransportError::ServerError {
            code: None,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Invoke a named remote procedure with positional arguments
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, method: &str, args: Tuple) -> Result<Tuple>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn call(&self, method: &str, args: Tuple) -> Result<Tuple> {
        (**self).call(method, args).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn call(&self, method: &str, args: Tuple) -> Result<Tuple> {
        (**self).call(method, args).await
    }
}
