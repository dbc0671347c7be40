use std::fmt;
use uuid::Uuid;

pub type TaskId = Uuid;

/// A unit of work run on the executor's worker thread.
///
/// Any `FnOnce() + Send + 'static` closure is a task. Ownership moves into the
/// executor on submission and the task is dropped once it has run, or when a
/// non-draining shutdown discards it.
pub trait Task: Send + 'static {
    fn run(self: Box<Self>);
}

impl<F> Task for F
where
    F: FnOnce() + Send + 'static,
{
    fn run(self: Box<Self>) {
        (*self)()
    }
}

/// A task as it sits in the queue.
pub(crate) struct Job {
    pub(crate) id: TaskId,
    /// Position in execution order, starting at 0 for each executor.
    pub(crate) seq: u64,
    task: Box<dyn Task>,
}

impl Job {
    pub(crate) fn new(id: TaskId, seq: u64, task: Box<dyn Task>) -> Self {
        Self { id, seq, task }
    }

    pub(crate) fn run(self) {
        self.task.run()
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}
