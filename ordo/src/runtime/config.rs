use serde::Deserialize;

pub const DEFAULT_THREAD_NAME: &str = "ordo-serial";

/// Plain configuration of a [`SerialExecutor`](crate::runtime::SerialExecutor).
///
/// Deserializable so a host application can embed it in its own config file;
/// every field is optional there.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Name given to the worker thread.
    pub thread_name: String,

    /// Stack size of the worker thread in bytes. `None` uses the platform default.
    pub stack_size: Option<usize>,

    /// Whether dropping the executor lets queued tasks finish first.
    pub drain_on_drop: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
            drain_on_drop: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ExecutorConfig::default();
        assert_eq!(config.thread_name, "ordo-serial");
        assert_eq!(config.stack_size, None);
        assert!(config.drain_on_drop);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ExecutorConfig =
            serde_json::from_str(r#"{ "thread_name": "segment-writer" }"#).unwrap();

        assert_eq!(config.thread_name, "segment-writer");
        assert!(config.drain_on_drop);
    }

    #[test]
    fn full_json() {
        let config: ExecutorConfig = serde_json::from_str(
            r#"{ "thread_name": "w", "stack_size": 65536, "drain_on_drop": false }"#,
        )
        .unwrap();

        assert_eq!(
            config,
            ExecutorConfig {
                thread_name: "w".to_string(),
                stack_size: Some(65536),
                drain_on_drop: false,
            }
        );
    }
}
