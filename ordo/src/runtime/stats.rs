use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::runtime::state::ExecutorState;

/// Point-in-time counters of a [`SerialExecutor`](crate::runtime::SerialExecutor).
///
/// Once the executor is `Stopped` the counters are final and
/// `submitted == completed + faulted + discarded`. While it runs, the task on
/// the worker is counted in `submitted` but in none of the other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutorStats {
    pub state: ExecutorState,
    /// Tasks accepted by `submit`/`spawn`.
    pub submitted: u64,
    /// Submissions refused because the executor was not running.
    pub rejected: u64,
    /// Tasks that ran to completion.
    pub completed: u64,
    /// Tasks that panicked.
    pub faulted: u64,
    /// Tasks dropped unrun by a non-draining shutdown.
    pub discarded: u64,
    /// Tasks waiting in the queue.
    pub pending: usize,
}

/// Counters updated outside the queue lock.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    rejected: AtomicU64,
    completed: AtomicU64,
    faulted: AtomicU64,
}

impl Counters {
    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_faulted(&self) {
        self.faulted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub(crate) fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub(crate) fn faulted(&self) -> u64 {
        self.faulted.load(Ordering::Relaxed)
    }
}
