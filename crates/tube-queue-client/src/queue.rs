use crate::{QueueError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, trace};
use tube_queue_core::{DecodeError, Options, Task, TaskId, Tuple, Value};
use tube_queue_transport::{Driver, Transport};

/// Handle on one named tube of the remote queue.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct Queue {
    transport: Arc<dyn Transport>,
    name: String,
}

impl Queue {
    pub fn new(transport: Arc<dyn Transport>, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(QueueError::ConstructionError(
                "Tube name must not be empty".to_string(),
            ));
        }

        Ok(Queue { transport, name })
    }

    /// Build a queue from either an async transport or a legacy blocking
    /// driver.
    pub fn with_driver(driver: Driver, name: impl Into<String>) -> Result<Self> {
        debug!(kind = driver.kind(), "constructing queue");
        Self::new(driver.into_transport(), name)
    }

    /// Build a queue from a dynamically typed client object.
    ///
    /// Only `Arc<dyn Transport>` and `Arc<dyn BlockingDriver>` are accepted.
    pub fn from_any(client: Box<dyn Any + Send + Sync>, name: impl Into<String>) -> Result<Self> {
        let driver = Driver::from_any(client).map_err(|_| {
            QueueError::ConstructionError(
                "Queue::from_any() expects Arc<dyn Transport> or Arc<dyn BlockingDriver>, \
                 got an unsupported client object (concrete transports such as \
                 Box<MockTransport> or Arc<MockTransport> must be erased to \
                 Arc<dyn Transport> first)"
                    .to_string(),
            )
        })?;

        Self::with_driver(driver, name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a task to the tube
    pub async fn put(&self, data: impl Into<Value>, options: impl Into<Options>) -> Result<Task> {
        let reply = self
            .invoke("put", vec![data.into(), Value::Object(options.into())])
            .await?;
        self.decode_task(reply, "put")
    }

    /// Take a ready task, waiting up to `timeout` seconds on the server.
    ///
    /// `None` means no task became available in time.
    pub async fn take(&self, timeout: Option<f64>) -> Result<Option<Task>> {
        let timeout = timeout.map(Value::from).unwrap_or(Value::Null);
        let reply = self.invoke("take", vec![timeout]).await?;
        decode_optional_task(reply)
    }

    /// Extend the lease of a taken task by `increment` seconds
    pub async fn touch(&self, task_id: TaskId, increment: f64) -> Result<Option<Task>> {
        let reply = self
            .invoke("touch", vec![Value::from(task_id), Value::from(increment)])
            .await?;
        decode_optional_task(reply)
    }

    pub async fn ack(&self, task_id: TaskId) -> Result<Task> {
        let reply = self.invoke("ack", vec![Value::from(task_id)]).await?;
        self.decode_task(reply, "ack")
    }

    /// Return a taken task to the ready state
    pub async fn release(&self, task_id: TaskId, options: impl Into<Options>) -> Result<Task> {
        let reply = self
            .invoke(
                "release",
                vec![Value::from(task_id), Value::Object(options.into())],
            )
            .await?;
        self.decode_task(reply, "release")
    }

    pub async fn peek(&self, task_id: TaskId) -> Result<Task> {
        let reply = self.invoke("peek", vec![Value::from(task_id)]).await?;
        self.decode_task(reply, "peek")
    }

    pub async fn bury(&self, task_id: TaskId) -> Result<Task> {
        let reply = self.invoke("bury", vec![Value::from(task_id)]).await?;
        self.decode_task(reply, "bury")
    }

    /// Move up to `count` buried tasks back to ready; returns how many moved
    pub async fn kick(&self, count: u64) -> Result<u64> {
        let reply = self.invoke("kick", vec![Value::from(count)]).await?;
        let kicked = self.expect_first(reply, "kick")?;

        kicked.as_u64().ok_or_else(|| {
            QueueError::DecodeError(DecodeError::Payload(format!(
                "kick returned a non-integer count: {}",
                kicked
            )))
        })
    }

    pub async fn delete(&self, task_id: TaskId) -> Result<Task> {
        let reply = self.invoke("delete", vec![Value::from(task_id)]).await?;
        self.decode_task(reply, "delete")
    }

    /// Remove every task from the tube
    pub async fn truncate(&self) -> Result<()> {
        self.invoke("truncate", Vec::new()).await?;
        Ok(())
    }

    /// Fetch tube statistics, optionally narrowed by a dotted path such as
    /// `"tasks.ready"`.
    pub async fn stats(&self, path: Option<&str>) -> Result<Value> {
        let method = "queue.stats";
        debug!(method, tube = %self.name, "remote call");

        let reply = self
            .transport
            .call(method, vec![Value::from(self.name.as_str())])
            .await?;
        let stats = reply.into_iter().next().ok_or_else(|| {
            QueueError::DecodeError(DecodeError::EmptyReply(method.to_string()))
        })?;

        match path {
            None => Ok(stats),
            Some(path) => lookup_path(stats, path),
        }
    }

    /// Call an arbitrary tube method: `queue.tube.<name>:<method_name>`
    pub async fn call(&self, method_name: &str, args: Tuple) -> Result<Tuple> {
        self.invoke(method_name, args).await
    }

    /// Typed form of [`Queue::call`].
    ///
    /// A serialized sequence becomes the argument list, `()` becomes no
    /// arguments, and any other value is passed as a single argument. The
    /// reply tuple is deserialized into `R`.
    pub async fn call_as<A, R>(&self, method_name: &str, args: A) -> Result<R>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        let args = match serde_json::to_value(args) {
            Ok(Value::Array(args)) => args,
            Ok(Value::Null) => Vec::new(),
            Ok(arg) => vec![arg],
            Err(e) => {
                return Err(QueueError::InvalidArgument(format!(
                    "Cannot serialize arguments for {}: {}",
                    method_name, e
                )))
            }
        };

        let reply = self.invoke(method_name, args).await?;
        serde_json::from_value(Value::Array(reply))
            .map_err(|e| QueueError::DecodeError(DecodeError::Payload(e.to_string())))
    }

    fn method(&self, operation: &str) -> String {
        format!("queue.tube.{}:{}", self.name, operation)
    }

    async fn invoke(&self, operation: &str, args: Tuple) -> Result<Tuple> {
        let method = self.method(operation);
        debug!(method = %method, args = args.len(), "remote call");

        Ok(self.transport.call(&method, args).await?)
    }

    /// First element of a reply that must carry a payload
    fn expect_first(&self, reply: Tuple, operation: &str) -> Result<Value> {
        reply.into_iter().next().ok_or_else(|| {
            QueueError::DecodeError(DecodeError::EmptyReply(self.method(operation)))
        })
    }

    fn decode_task(&self, reply: Tuple, operation: &str) -> Result<Task> {
        let tuple = self.expect_first(reply, operation)?;
        Ok(Task::from_value(&tuple)?)
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A missing or empty first element means "no task"
fn decode_optional_task(reply: Tuple) -> Result<Option<Task>> {
    match reply.into_iter().next() {
        Some(tuple) if !is_empty_value(&tuple) => Ok(Some(Task::from_value(&tuple)?)),
        _ => {
            trace!("reply carried no task");
            Ok(None)
        }
    }
}

/// Values the server uses to signal "nothing": null, false, zero, "", "0",
/// and empty arrays or maps
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn lookup_path(stats: Value, path: &str) -> Result<Value> {
    let mut current = stats;
    for key in path.split('.') {
        current = match current {
            Value::Object(mut map) => match map.remove(key) {
                Some(Value::Null) | None => None,
                Some(value) => Some(value),
            },
            _ => None,
        }
        .ok_or_else(|| QueueError::InvalidArgument(format!("Invalid path \"{}\".", path)))?;
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tube_queue_transport::mock::MockTransport;

    #[test]
    fn test_lookup_path() {
        let stats = json!({"tasks": {"ready": 4, "taken": 1}, "calls": {"put": 10}});

        assert_eq!(lookup_path(stats.clone(), "tasks.ready").unwrap(), json!(4));
        assert_eq!(lookup_path(stats.clone(), "calls").unwrap(), json!({"put": 10}));
        assert!(matches!(
            lookup_path(stats.clone(), "tasks.buried"),
            Err(QueueError::InvalidArgument(_))
        ));
        assert!(matches!(
            lookup_path(stats, "tasks.ready.deeper"),
            Err(QueueError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_lookup_path_null_is_missing() {
        let stats = json!({"tasks": null});
        match lookup_path(stats, "tasks") {
            Err(QueueError::InvalidArgument(message)) => {
                assert_eq!(message, "Invalid path \"tasks\".");
            }
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_optional_task() {
        assert!(decode_optional_task(vec![]).unwrap().is_none());
        assert!(decode_optional_task(vec![json!(null)]).unwrap().is_none());
        assert!(decode_optional_task(vec![json!([])]).unwrap().is_none());
        assert!(decode_optional_task(vec![json!(false)]).unwrap().is_none());
        assert!(decode_optional_task(vec![json!(0)]).unwrap().is_none());
        assert!(decode_optional_task(vec![json!("")]).unwrap().is_none());
        assert!(decode_optional_task(vec![json!("0")]).unwrap().is_none());
        assert!(decode_optional_task(vec![json!({})]).unwrap().is_none());

        assert!(matches!(
            decode_optional_task(vec![json!(true)]),
            Err(QueueError::DecodeError(DecodeError::NotATuple("boolean")))
        ));

        let task = decode_optional_task(vec![json!([5, "t", "x"])]).unwrap().unwrap();
        assert_eq!(task.id(), 5);

        assert!(matches!(
            decode_optional_task(vec![json!([5])]),
            Err(QueueError::DecodeError(DecodeError::TupleTooShort { .. }))
        ));
    }

    #[test]
    fn test_decode_task_requires_payload() {
        let queue = Queue::new(Arc::new(MockTransport::new()), "jobs").unwrap();

        match queue.decode_task(vec![], "ack") {
            Err(QueueError::DecodeError(DecodeError::EmptyReply(method))) => {
                assert_eq!(method, "queue.tube.jobs:ack");
            }
            other => panic!("Expected EmptyReply, got {:?}", other),
        }
    }
}
