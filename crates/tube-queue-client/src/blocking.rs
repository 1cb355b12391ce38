use crate::{Queue, QueueError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tube_queue_core::{Options, Task, TaskId, Tuple, Value};

/// Synchronous queue handle (wraps the async [`Queue`])
///
/// # Panics
///
/// Every method drives its own tokio runtime with `block_on`, so calling one
/// from inside an async context panics. Use [`BlockingQueue::as_async`] there.
pub struct BlockingQueue {
    runtime: tokio::runtime::Runtime,
    inner: Queue,
}

impl BlockingQueue {
    pub fn new(queue: Queue) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| QueueError::ConstructionError(e.to_string()))?;

        Ok(BlockingQueue {
            runtime,
            inner: queue,
        })
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// The async queue this handle drives
    pub fn as_async(&self) -> &Queue {
        &self.inner
    }

    pub fn put(&self, data: impl Into<Value>, options: impl Into<Options>) -> Result<Task> {
        self.runtime.block_on(self.inner.put(data, options))
    }

    pub fn take(&self, timeout: Option<f64>) -> Result<Option<Task>> {
        self.runtime.block_on(self.inner.take(timeout))
    }

    pub fn touch(&self, task_id: TaskId, increment: f64) -> Result<Option<Task>> {
        self.runtime.block_on(self.inner.touch(task_id, increment))
    }

    pub fn ack(&self, task_id: TaskId) -> Result<Task> {
        self.runtime.block_on(self.inner.ack(task_id))
    }

    pub fn release(&self, task_id: TaskId, options: impl Into<Options>) -> Result<Task> {
        self.runtime.block_on(self.inner.release(task_id, options))
    }

    pub fn peek(&self, task_id: TaskId) -> Result<Task> {
        self.runtime.block_on(self.inner.peek(task_id))
    }

    pub fn bury(&self, task_id: TaskId) -> Result<Task> {
        self.runtime.block_on(self.inner.bury(task_id))
    }

    pub fn kick(&self, count: u64) -> Result<u64> {
        self.runtime.block_on(self.inner.kick(count))
    }

    pub fn delete(&self, task_id: TaskId) -> Result<Task> {
        self.runtime.block_on(self.inner.delete(task_id))
    }

    pub fn truncate(&self) -> Result<()> {
        self.runtime.block_on(self.inner.truncate())
    }

    pub fn stats(&self, path: Option<&str>) -> Result<Value> {
        self.runtime.block_on(self.inner.stats(path))
    }

    pub fn call(&self, method_name: &str, args: Tuple) -> Result<Tuple> {
        self.runtime.block_on(self.inner.call(method_name, args))
    }

    pub fn call_as<A, R>(&self, method_name: &str, args: A) -> Result<R>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        self.runtime.block_on(self.inner.call_as(method_name, args))
    }
}
