use crate::runtime::task::TaskId;

use std::cell::Cell;

thread_local! {
    /// Id and sequence number of the task currently running on this thread.
    ///
    /// Only ever set on a worker thread, for the duration of one task.
    static CURRENT_TASK: Cell<Option<(TaskId, u64)>> = const { Cell::new(None) };
}

/// Restores the previous task context on drop, including during unwinding.
struct ContextGuard {
    prev: Option<(TaskId, u64)>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_TASK.with(|c| c.set(self.prev));
    }
}

/// Runs `f` with the given task installed as the current task of this thread.
pub(crate) fn enter_task<R>(id: TaskId, seq: u64, f: impl FnOnce() -> R) -> R {
    let prev = CURRENT_TASK.with(|c| c.replace(Some((id, seq))));
    let _guard = ContextGuard { prev };
    f()
}

pub(crate) fn current() -> Option<(TaskId, u64)> {
    CURRENT_TASK.with(|c| c.get())
}

/// Id of the task executing on the calling thread, if any.
///
/// Returns `None` outside of a task, including on the worker thread between
/// two tasks.
pub fn current_task() -> Option<TaskId> {
    current().map(|(id, _)| id)
}
