use crate::{Queue, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tube_queue_core::{Options, Task, TaskId, TaskOptions, Value};
use tube_queue_transport::Transport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Tube the queue handle is bound to
    pub tube: String,

    /// Server-side wait for `take`, in seconds
    #[serde(default)]
    pub take_timeout: Option<f64>,

    /// Default options for `put`
    #[serde(default)]
    pub put: TaskOptions,

    /// Default options for `release`
    #[serde(default)]
    pub release: TaskOptions,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            tube: "default".to_string(),
            take_timeout: None,
            put: TaskOptions::default(),
            release: TaskOptions::default(),
        }
    }
}

impl QueueConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> anyhow::Result<Self> {
        let config: QueueConfig = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Open a queue handle on the configured tube that applies this
    /// config's defaults
    pub fn open(&self, transport: Arc<dyn Transport>) -> Result<ConfiguredQueue> {
        let queue = Queue::new(transport, self.tube.clone())?;

        Ok(ConfiguredQueue {
            queue,
            take_timeout: self.take_timeout,
            put: self.put.clone().into_options(),
            release: self.release.clone().into_options(),
        })
    }
}

/// A [`Queue`] plus the defaults from a [`QueueConfig`].
///
/// `take(None)` falls back to the configured timeout, and the configured
/// `put` / `release` options sit underneath whatever the caller passes:
/// a key given by the caller wins. Every other operation goes through
/// [`ConfiguredQueue::queue`] unchanged.
#[derive(Debug, Clone)]
pub struct ConfiguredQueue {
    queue: Queue,
    take_timeout: Option<f64>,
    put: Options,
    release: Options,
}

impl ConfiguredQueue {
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn into_queue(self) -> Queue {
        self.queue
    }

    pub fn name(&self) -> &str {
        self.queue.name()
    }

    pub async fn put(&self, data: impl Into<Value>, options: impl Into<Options>) -> Result<Task> {
        let options = merge(&self.put, options.into());
        self.queue.put(data, options).await
    }

    pub async fn take(&self, timeout: Option<f64>) -> Result<Option<Task>> {
        self.queue.take(timeout.or(self.take_timeout)).await
    }

    pub async fn release(&self, task_id: TaskId, options: impl Into<Options>) -> Result<Task> {
        let options = merge(&self.release, options.into());
        self.queue.release(task_id, options).await
    }
}

fn merge(defaults: &Options, overrides: Options) -> Options {
    let mut options = defaults.clone();
    options.extend(overrides);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_yaml() {
        let config = QueueConfig::from_yaml_str(
            r#"
tube: thumbnails
take_timeout: 2.5
put:
  ttl: 3600
  pri: 5
  utube: user-42
"#,
        )
        .unwrap();

        assert_eq!(config.tube, "thumbnails");
        assert_eq!(config.take_timeout, Some(2.5));
        assert_eq!(config.put.ttl, Some(3600.0));
        assert_eq!(config.put.pri, Some(5));
        assert_eq!(config.put.utube.as_deref(), Some("user-42"));
        assert!(config.release.is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tube: mail").unwrap();
        writeln!(file, "release:").unwrap();
        writeln!(file, "  delay: 10").unwrap();

        let config = QueueConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tube, "mail");
        assert_eq!(config.take_timeout, None);
        assert_eq!(config.release.delay, Some(10.0));
    }

    #[test]
    fn test_merge_prefers_caller_options() {
        let defaults = TaskOptions::new().ttl(60.0).pri(1).into_options();
        let merged = merge(&defaults, TaskOptions::new().pri(9).into_options());

        assert_eq!(merged.get("ttl"), Some(&serde_json::json!(60.0)));
        assert_eq!(merged.get("pri"), Some(&serde_json::json!(9)));
    }

    #[test]
    fn test_missing_tube_is_rejected() {
        assert!(QueueConfig::from_yaml_str("take_timeout: 1").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(QueueConfig::from_file("/nonexistent/queue.yaml").is_err());
    }
}
