use crate::runtime::error::RejectedError;
use crate::runtime::state::ExecutorState;
use crate::runtime::task::{Job, Task, TaskId};

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Ordered, unbounded queue shared by the producers and the worker thread.
///
/// The executor state lives under the same lock as the pending jobs, so a
/// submission either lands in the queue while the executor is running or is
/// rejected; it can never be enqueued behind the worker's back after shutdown.
pub(crate) struct TaskQueue {
    inner: Mutex<Inner>,

    /// Signalled when a job is pushed or shutdown begins.
    available: Condvar,

    /// Signalled when the state reaches `Stopped` and when the worker exits.
    terminated: Condvar,
}

struct Inner {
    jobs: VecDeque<Job>,
    state: ExecutorState,
    /// Whether the current shutdown lets queued jobs finish.
    drain: bool,
    /// Sequence number of the next accepted job; equals the number accepted so far.
    next_seq: u64,
    discarded: u64,
    /// Set once the worker has run its stop hook, or when no worker will ever run.
    exited: bool,
}

/// Counters read under the queue lock, see [`TaskQueue::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QueueSnapshot {
    pub(crate) state: ExecutorState,
    pub(crate) accepted: u64,
    pub(crate) discarded: u64,
    pub(crate) pending: usize,
}

/// What a call to [`TaskQueue::shutdown`] did.
#[derive(Debug)]
pub(crate) struct ShutdownOutcome {
    /// State before the call.
    pub(crate) previous: ExecutorState,
    /// Jobs queued when the call was made.
    pub(crate) pending: usize,
    /// Jobs removed from the queue; the caller drops them outside the lock.
    pub(crate) discarded: Vec<Job>,
}

impl TaskQueue {
    pub(crate) fn new() -> Self {
        TaskQueue {
            inner: Mutex::new(Inner {
                jobs: VecDeque::new(),
                state: ExecutorState::Created,
                drain: true,
                next_seq: 0,
                discarded: 0,
                exited: false,
            }),
            available: Condvar::new(),
            terminated: Condvar::new(),
        }
    }

    pub(crate) fn state(&self) -> ExecutorState {
        self.inner.lock().state
    }

    /// Moves `Created` to `Running`.
    ///
    /// Returns `Ok(false)` if the executor is already running.
    pub(crate) fn begin(&self) -> Result<bool, RejectedError> {
        let mut inner = self.inner.lock();
        match inner.state {
            ExecutorState::Created => {
                inner.state = ExecutorState::Running;
                Ok(true)
            }
            ExecutorState::Running => Ok(false),
            state => Err(RejectedError::new(state)),
        }
    }

    /// Appends a job and wakes the worker.
    ///
    /// On rejection the task is handed back so it is not dropped under the lock.
    pub(crate) fn push(
        &self,
        id: TaskId,
        task: Box<dyn Task>,
    ) -> Result<u64, (RejectedError, Box<dyn Task>)> {
        let mut inner = self.inner.lock();

        if !inner.state.is_accepting() {
            return Err((RejectedError::new(inner.state), task));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.jobs.push_back(Job::new(id, seq, task));
        drop(inner);

        self.available.notify_one();
        Ok(seq)
    }

    /// Takes the next job, blocking while the queue is empty and the executor
    /// is still running.
    ///
    /// Returns `None` once shutdown has begun and no job is left, which tells
    /// the worker to exit.
    pub(crate) fn pop(&self) -> Option<Job> {
        let mut inner = self.inner.lock();

        loop {
            if let Some(job) = inner.jobs.pop_front() {
                return Some(job);
            }

            if inner.state != ExecutorState::Running {
                return None;
            }

            self.available.wait(&mut inner);
        }
    }

    /// Begins shutdown.
    ///
    /// A non-draining shutdown empties the queue immediately; a later
    /// non-draining call escalates a draining shutdown the same way.
    pub(crate) fn shutdown(&self, drain: bool) -> ShutdownOutcome {
        let mut inner = self.inner.lock();
        let previous = inner.state;
        let pending = inner.jobs.len();

        match previous {
            ExecutorState::Created => {
                let discarded = Self::discard(&mut inner);
                inner.state = ExecutorState::Stopped;
                inner.exited = true;
                drop(inner);

                self.terminated.notify_all();
                return ShutdownOutcome {
                    previous,
                    pending,
                    discarded,
                };
            }
            ExecutorState::Running => {
                inner.state = ExecutorState::ShuttingDown;
                inner.drain = drain;
            }
            ExecutorState::ShuttingDown if inner.drain && !drain => {
                inner.drain = false;
            }
            ExecutorState::ShuttingDown | ExecutorState::Stopped => {
                return ShutdownOutcome {
                    previous,
                    pending,
                    discarded: Vec::new(),
                };
            }
        }

        let discarded = if drain {
            Vec::new()
        } else {
            Self::discard(&mut inner)
        };
        drop(inner);

        self.available.notify_all();
        ShutdownOutcome {
            previous,
            pending,
            discarded,
        }
    }

    /// Marks the executor `Stopped` and wakes everyone waiting for it.
    ///
    /// Any job still queued (only possible when the worker never started) is
    /// returned to the caller.
    pub(crate) fn finish(&self) -> Vec<Job> {
        let mut inner = self.inner.lock();
        let discarded = Self::discard(&mut inner);
        inner.state = ExecutorState::Stopped;
        drop(inner);

        self.available.notify_all();
        self.terminated.notify_all();
        discarded
    }

    /// Records that the worker thread is done with the executor.
    ///
    /// Forces `Stopped` as well, so waiters are released even if the worker
    /// unwound before reaching [`finish`](Self::finish).
    pub(crate) fn mark_exited(&self) -> Vec<Job> {
        let mut inner = self.inner.lock();
        let discarded = Self::discard(&mut inner);
        inner.state = ExecutorState::Stopped;
        inner.exited = true;
        drop(inner);

        self.available.notify_all();
        self.terminated.notify_all();
        discarded
    }

    /// Blocks until [`mark_exited`](Self::mark_exited) has been called.
    pub(crate) fn wait_exited(&self) {
        let mut inner = self.inner.lock();
        while !inner.exited {
            self.terminated.wait(&mut inner);
        }
    }

    /// Blocks until the state is `Stopped`, or until `timeout` elapses.
    pub(crate) fn wait_stopped(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut inner = self.inner.lock();

        while inner.state != ExecutorState::Stopped {
            match deadline {
                Some(deadline) => {
                    if self.terminated.wait_until(&mut inner, deadline).timed_out() {
                        return inner.state == ExecutorState::Stopped;
                    }
                }
                None => self.terminated.wait(&mut inner),
            }
        }

        true
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().jobs.len()
    }

    pub(crate) fn snapshot(&self) -> QueueSnapshot {
        let inner = self.inner.lock();
        QueueSnapshot {
            state: inner.state,
            accepted: inner.next_seq,
            discarded: inner.discarded,
            pending: inner.jobs.len(),
        }
    }

    fn discard(inner: &mut Inner) -> Vec<Job> {
        let jobs: Vec<Job> = inner.jobs.drain(..).collect();
        inner.discarded += jobs.len() as u64;
        jobs
    }
}
