use serde::Serialize;
use std::fmt;

/// Lifecycle of a [`SerialExecutor`](crate::runtime::SerialExecutor).
///
/// Transitions only move forward:
/// `Created -> Running -> ShuttingDown -> Stopped`. An executor that is shut
/// down before it was ever started goes straight from `Created` to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorState {
    /// Constructed, worker thread not spawned yet.
    Created,
    /// Worker thread is alive and submissions are accepted.
    Running,
    /// Shutdown requested; the worker is finishing its current (or queued) work.
    ShuttingDown,
    /// Worker thread has exited. Terminal.
    Stopped,
}

impl ExecutorState {
    /// Only a running executor accepts new tasks.
    pub fn is_accepting(self) -> bool {
        matches!(self, ExecutorState::Running)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutorState::Stopped)
    }
}

impl Default for ExecutorState {
    fn default() -> Self {
        ExecutorState::Created
    }
}

impl fmt::Display for ExecutorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutorState::Created => "created",
            ExecutorState::Running => "running",
            ExecutorState::ShuttingDown => "shutting down",
            ExecutorState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
