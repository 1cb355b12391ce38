//! Scripted in-memory transport.
//!
//! Replies are served in the order they were queued, independent of the
//! method called. Every call is recorded so tests can assert on the exact
//! method string and arguments that reached the transport.

use crate::{Result, Transport, TransportError, Tuple};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// One call observed by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub args: Tuple,
}

#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<Tuple>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn with_reply(self, reply: Tuple) -> Self {
        self.push_reply(reply);
        self
    }

    /// Queue a failing reply
    pub fn with_error(self, error: TransportError) -> Self {
        self.push_error(error);
        self
    }

    pub fn push_reply(&self, reply: Tuple) {
        self.replies.lock().push_back(Ok(reply));
    }

    pub fn push_error(&self, error: TransportError) {
        self.replies.lock().push_back(Err(error));
    }

    /// All calls seen so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of queued replies not yet consumed
    pub fn pending_replies(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, method: &str, args: Tuple) -> Result<Tuple> {
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            args,
        });

        self.replies.lock().pop_front().unwrap_or_else(|| {
            Err(TransportError::ProtocolError(format!(
                "No reply scripted for {}",
                method
            )))
        })
    }
}
