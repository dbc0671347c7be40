use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::runtime::context;
use crate::runtime::error::{Error, TaskFault};
use crate::runtime::task::{Task, TaskId};

/// Completion handle for a task submitted with `spawn`.
///
/// Resolves to the task's return value once it has run on the worker thread,
/// to [`Error::Canceled`] if the task was discarded by a non-draining
/// shutdown, or to [`Error::Fault`] if it panicked. Dropping the handle does
/// not cancel the task.
pub struct TaskHandle<T> {
    id: TaskId,
    receiver: oneshot::Receiver<Result<T, Error>>,
}

// Manual Debug implementation - works regardless of whether T implements Debug
impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("result_type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> TaskHandle<T>
where
    T: Send + 'static,
{
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Blocks the current thread until the task has run.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context; await
    /// the handle there instead. Calling it from a task on the same executor
    /// never returns, since the awaited task is queued behind the caller.
    pub fn wait(self) -> Result<T, Error> {
        self.receiver.blocking_recv()?
    }

    /// Returns the result if the task has already finished.
    pub fn try_result(&mut self) -> Option<Result<T, Error>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(Error::Canceled)),
        }
    }
}

impl<T> Future for TaskHandle<T>
where
    T: Send + 'static,
{
    type Output = Result<T, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| match result {
                Ok(task_result) => task_result,
                Err(_) => Err(Error::Canceled),
            })
    }
}

/// Wraps a value-returning closure into a [`Task`] that reports through a
/// [`TaskHandle`].
///
/// A panic is reported to the handle and then resumed so that the worker
/// records it as a fault as well.
pub(crate) fn with_handle<F, T>(id: TaskId, f: F) -> (impl Task, TaskHandle<T>)
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();

    let task = move || match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => {
            let _ = sender.send(Ok(value));
        }
        Err(payload) => {
            let seq = context::current().map(|(_, seq)| seq).unwrap_or_default();
            let fault = TaskFault::from_panic(id, seq, payload.as_ref());
            let _ = sender.send(Err(Error::Fault(fault)));
            panic::resume_unwind(payload);
        }
    };

    (task, TaskHandle { id, receiver })
}
