use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque option map forwarded to the server with `put` and `release`
pub type Options = Map<String, Value>;

/// Builder for the option map accepted by `put` and `release`.
///
/// The named fields cover what the stock queue drivers understand; anything
/// else can be added with [`TaskOptions::set`]. Nothing is validated here,
/// the server decides what an option means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskOptions {
    /// Seconds before the task becomes ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,

    /// Seconds the task may live in the queue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<f64>,

    /// Seconds a consumer may hold the task before it is released
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttr: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pri: Option<i64>,

    /// Sub-queue name for drivers that support it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utube: Option<String>,

    #[serde(flatten)]
    pub extra: Options,
}

impl TaskOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = Some(seconds);
        self
    }

    pub fn ttl(mut self, seconds: f64) -> Self {
        self.ttl = Some(seconds);
        self
    }

    pub fn ttr(mut self, seconds: f64) -> Self {
        self.ttr = Some(seconds);
        self
    }

    pub fn pri(mut self, priority: i64) -> Self {
        self.pri = Some(priority);
        self
    }

    pub fn utube(mut self, name: impl Into<String>) -> Self {
        self.utube = Some(name.into());
        self
    }

    /// Set an arbitrary server-defined option.
    ///
    /// A key matching a named field replaces that field's value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        match key.as_str() {
            "delay" => self.delay = None,
            "ttl" => self.ttl = None,
            "ttr" => self.ttr = None,
            "pri" => self.pri = None,
            "utube" => self.utube = None,
            _ => {}
        }
        self.extra.insert(key, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.delay.is_none()
            && self.ttl.is_none()
            && self.ttr.is_none()
            && self.pri.is_none()
            && self.utube.is_none()
            && self.extra.is_empty()
    }

    pub fn into_options(self) -> Options {
        let mut options = Options::new();
        if let Some(delay) = self.delay {
            options.insert("delay".to_string(), Value::from(delay));
        }
        if let Some(ttl) = self.ttl {
            options.insert("ttl".to_string(), Value::from(ttl));
        }
        if let Some(ttr) = self.ttr {
            options.insert("ttr".to_string(), Value::from(ttr));
        }
        if let Some(pri) = self.pri {
            options.insert("pri".to_string(), Value::from(pri));
        }
        if let Some(utube) = self.utube {
            options.insert("utube".to_string(), Value::from(utube));
        }
        options.extend(self.extra);
        options
    }
}

impl From<TaskOptions> for Options {
    fn from(options: TaskOptions) -> Self {
        options.into_options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_options() {
        let options = TaskOptions::new();
        assert!(options.is_empty());
        assert!(options.into_options().is_empty());
    }

    #[test]
    fn test_builder() {
        let options: Options = TaskOptions::new()
            .delay(30.0)
            .ttr(60.5)
            .pri(2)
            .utube("images")
            .into();

        assert_eq!(
            Value::Object(options),
            json!({"delay": 30.0, "ttr": 60.5, "pri": 2, "utube": "images"})
        );
    }

    #[test]
    fn test_set_overrides_named_field() {
        let options = TaskOptions::new()
            .ttl(10.0)
            .set("ttl", 20)
            .set("retries", 3)
            .into_options();

        assert_eq!(options.get("ttl"), Some(&json!(20)));
        assert_eq!(options.get("retries"), Some(&json!(3)));
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_deserialize_with_extra_keys() {
        let options: TaskOptions =
            serde_json::from_value(json!({"delay": 5.0, "custom": "yes"})).unwrap();

        assert_eq!(options.delay, Some(5.0));
        assert_eq!(options.extra.get("custom"), Some(&json!("yes")));
    }
}
