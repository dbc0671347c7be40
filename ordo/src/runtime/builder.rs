use std::fmt;
use std::sync::Arc;

use crate::runtime::config::ExecutorConfig;
use crate::runtime::error::{Error, TaskFault};
use crate::runtime::executor::SerialExecutor;

pub(crate) type Callback = Arc<dyn Fn() + Send + Sync>;
pub(crate) type FaultObserver = Arc<dyn Fn(&TaskFault) + Send + Sync>;

/// Callbacks invoked by the worker thread.
#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) on_thread_start: Option<Callback>,
    pub(crate) on_thread_stop: Option<Callback>,
    pub(crate) on_fault: Option<FaultObserver>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_thread_start", &self.on_thread_start.is_some())
            .field("on_thread_stop", &self.on_thread_stop.is_some())
            .field("on_fault", &self.on_fault.is_some())
            .finish()
    }
}

/// Builder for configuring and creating a [`SerialExecutor`].
///
/// # Examples
///
/// ```rust,ignore
/// let executor = ExecutorBuilder::new()
///     .thread_name("segment-writer")
///     .on_fault(|fault| eprintln!("{fault}"))
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct ExecutorBuilder {
    config: ExecutorConfig,
    hooks: Hooks,
}

impl ExecutorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration, keeping registered hooks.
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.config.stack_size = Some(bytes);
        self
    }

    /// Whether dropping the executor drains the queue (`true`) or discards it.
    pub fn drain_on_drop(mut self, drain: bool) -> Self {
        self.config.drain_on_drop = drain;
        self
    }

    /// Runs `f` on the worker thread before it takes its first task.
    pub fn on_thread_start<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks.on_thread_start = Some(Arc::new(f));
        self
    }

    /// Runs `f` on the worker thread after the executor reached `Stopped`.
    pub fn on_thread_stop<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks.on_thread_stop = Some(Arc::new(f));
        self
    }

    /// Observer called on the worker thread for every task that panicked.
    ///
    /// Faults are always logged; the observer is an addition, not a replacement.
    pub fn on_fault<F>(mut self, f: F) -> Self
    where
        F: Fn(&TaskFault) + Send + Sync + 'static,
    {
        self.hooks.on_fault = Some(Arc::new(f));
        self
    }

    /// Builds the executor and starts its worker thread.
    pub fn build(self) -> Result<SerialExecutor, Error> {
        let executor = self.build_unstarted();
        executor.start()?;
        Ok(executor)
    }

    /// Builds the executor in the `Created` state; call `start` to run it.
    pub fn build_unstarted(self) -> SerialExecutor {
        SerialExecutor::from_parts(self.config, self.hooks)
    }
}
