use serde::Serialize;
use std::any::Any;
use thiserror::Error;

use crate::runtime::state::ExecutorState;
use crate::runtime::task::TaskId;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Rejected(#[from] RejectedError),

    #[error("task canceled before it ran")]
    Canceled,

    #[error(transparent)]
    Fault(#[from] TaskFault),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("global executor already initialized")]
    AlreadyInitialized,
}

impl From<tokio::sync::oneshot::error::RecvError> for Error {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Error::Canceled
    }
}

/// Returned by `submit` when the executor is not in the `Running` state.
///
/// The rejected task is dropped without running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("executor is not accepting work (state: {state})")]
pub struct RejectedError {
    state: ExecutorState,
}

impl RejectedError {
    pub(crate) fn new(state: ExecutorState) -> Self {
        Self { state }
    }

    /// State the executor was in when the submission was refused.
    pub fn state(&self) -> ExecutorState {
        self.state
    }
}

/// A task panicked on the worker thread.
///
/// The worker survives the panic; the fault is logged and handed to the
/// configured fault observer.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("task #{seq} ({task_id}) panicked: {message}")]
pub struct TaskFault {
    pub task_id: TaskId,
    pub seq: u64,
    pub message: String,
}

impl TaskFault {
    pub(crate) fn from_panic(task_id: TaskId, seq: u64, payload: &(dyn Any + Send)) -> Self {
        Self {
            task_id,
            seq,
            message: panic_message(payload),
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
