use crate::runtime::builder::{ExecutorBuilder, Hooks};
use crate::runtime::config::ExecutorConfig;
use crate::runtime::error::{Error, RejectedError};
use crate::runtime::executor::worker;
use crate::runtime::handle::{self, TaskHandle};
use crate::runtime::queue::TaskQueue;
use crate::runtime::state::ExecutorState;
use crate::runtime::stats::{Counters, ExecutorStats};
use crate::runtime::task::{Task, TaskId};

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// State shared between the executor handle and its worker thread.
pub(crate) struct Shared {
    pub(crate) queue: TaskQueue,
    pub(crate) config: ExecutorConfig,
    pub(crate) hooks: Hooks,
    pub(crate) counters: Counters,

    /// Set by the worker thread as the first thing it does.
    pub(crate) worker_thread: OnceLock<ThreadId>,
}

/// Runs submitted tasks one at a time, in submission order, on a single
/// dedicated thread.
///
/// Any number of threads may call [`submit`](Self::submit) concurrently. The
/// execution order is the order in which submissions acquired the queue lock.
/// A task that panics is reported as a [`TaskFault`](crate::runtime::TaskFault)
/// and the worker moves on to the next task.
///
/// Dropping the executor shuts it down (draining or not, per
/// [`ExecutorConfig::drain_on_drop`]) and joins the worker thread.
pub struct SerialExecutor {
    shared: Arc<Shared>,

    /// Join handle of the worker thread, taken by the first `join`.
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SerialExecutor {
    /// Creates an executor in the `Created` state with no hooks.
    ///
    /// Nothing runs until [`start`](Self::start) is called; use
    /// [`ExecutorBuilder`] to register hooks or to build and start in one step.
    pub fn new(config: ExecutorConfig) -> Self {
        Self::from_parts(config, Hooks::default())
    }

    pub fn builder() -> ExecutorBuilder {
        ExecutorBuilder::new()
    }

    pub(crate) fn from_parts(config: ExecutorConfig, hooks: Hooks) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: TaskQueue::new(),
                config,
                hooks,
                counters: Counters::default(),
                worker_thread: OnceLock::new(),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Spawns the worker thread and moves the executor to `Running`.
    ///
    /// Starting a running executor is a no-op. Starting one that has been shut
    /// down fails with [`Error::Rejected`]. If the thread cannot be spawned the
    /// executor ends up `Stopped`.
    pub fn start(&self) -> Result<(), Error> {
        if !self.shared.queue.begin()? {
            return Ok(());
        }

        let config = &self.shared.config;
        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(size) = config.stack_size {
            builder = builder.stack_size(size);
        }

        let shared = self.shared.clone();
        match builder.spawn(move || worker::run(shared)) {
            Ok(handle) => {
                *self.worker.lock() = Some(handle);
                info!(thread = %config.thread_name, "serial executor started");
                Ok(())
            }
            Err(e) => {
                error!(thread = %config.thread_name, error = %e, "failed to spawn worker thread");
                let stranded = self.shared.queue.mark_exited();
                drop(stranded);
                Err(Error::Spawn(e))
            }
        }
    }

    /// Enqueues `task` to run after every previously accepted task.
    ///
    /// Fails with [`RejectedError`] unless the executor is `Running`; a
    /// rejected task is dropped without running.
    pub fn submit<T>(&self, task: T) -> Result<(), RejectedError>
    where
        T: Task,
    {
        self.enqueue(TaskId::new_v4(), Box::new(task)).map(|_| ())
    }

    /// Enqueues a closure whose return value is delivered through a
    /// [`TaskHandle`].
    pub fn spawn<F, T>(&self, f: F) -> Result<TaskHandle<T>, RejectedError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let id = TaskId::new_v4();
        let (task, handle) = handle::with_handle(id, f);
        self.enqueue(id, Box::new(task))?;
        Ok(handle)
    }

    fn enqueue(&self, id: TaskId, task: Box<dyn Task>) -> Result<u64, RejectedError> {
        match self.shared.queue.push(id, task) {
            Ok(seq) => {
                trace!(task_id = %id, seq, "task queued");
                Ok(seq)
            }
            Err((rejected, task)) => {
                drop(task);
                self.shared.counters.record_rejected();
                debug!(task_id = %id, state = %rejected.state(), "submission rejected");
                Err(rejected)
            }
        }
    }

    /// Stops accepting tasks and tells the worker to exit.
    ///
    /// With `drain` the worker first runs everything already queued. Without
    /// it, queued tasks are dropped unrun and the worker exits after the task
    /// it is currently running, if any. Returns without waiting; see
    /// [`join`](Self::join) and [`await_termination`](Self::await_termination).
    ///
    /// Calling it again is a no-op, except that a non-draining call escalates a
    /// draining shutdown still in progress. Safe to call from inside a task.
    pub fn shutdown(&self, drain: bool) {
        let outcome = self.shared.queue.shutdown(drain);

        match outcome.previous {
            ExecutorState::Running => {
                info!(drain, pending = outcome.pending, "serial executor shutting down");
            }
            ExecutorState::Created => {
                debug!("serial executor shut down before it was started");
            }
            _ => {}
        }

        if !outcome.discarded.is_empty() {
            warn!(
                discarded = outcome.discarded.len(),
                "discarding queued tasks on shutdown"
            );
        }
        drop(outcome.discarded);
    }

    /// Blocks until the worker thread has exited, including its stop hook.
    ///
    /// Only returns once the executor is shut down. Any number of threads may
    /// join at once. Called from the worker thread itself it returns
    /// immediately.
    pub fn join(&self) {
        if self.is_worker_thread() {
            warn!("join called from the worker thread; not waiting for it");
            return;
        }

        let handle = self.worker.lock().take();
        match handle {
            Some(handle) => {
                if handle.join().is_err() {
                    error!("serial worker thread panicked");
                }
            }
            // Never started, or another caller holds the handle.
            None => self.shared.queue.wait_exited(),
        }
    }

    /// Waits up to `timeout` for the executor to reach `Stopped`.
    ///
    /// Returns whether it did. From the worker thread this does not wait.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        if self.is_worker_thread() {
            return self.state().is_terminal();
        }
        self.shared.queue.wait_stopped(Some(timeout))
    }

    pub fn state(&self) -> ExecutorState {
        self.shared.queue.state()
    }

    /// Number of tasks waiting in the queue, excluding the one running.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn stats(&self) -> ExecutorStats {
        let snapshot = self.shared.queue.snapshot();
        let counters = &self.shared.counters;

        ExecutorStats {
            state: snapshot.state,
            submitted: snapshot.accepted,
            rejected: counters.rejected(),
            completed: counters.completed(),
            faulted: counters.faulted(),
            discarded: snapshot.discarded,
            pending: snapshot.pending,
        }
    }

    /// Whether the calling thread is this executor's worker thread.
    pub fn is_worker_thread(&self) -> bool {
        self.shared.worker_thread.get() == Some(&thread::current().id())
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.shared.config
    }
}

impl fmt::Debug for SerialExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialExecutor")
            .field("config", &self.shared.config)
            .field("hooks", &self.shared.hooks)
            .field("state", &self.state())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Drop for SerialExecutor {
    fn drop(&mut self) {
        self.shutdown(self.shared.config.drain_on_drop);
        self.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::mpsc;

    fn panicking() -> impl FnOnce() + Send + 'static {
        || panic!("unit fault")
    }

    fn started() -> SerialExecutor {
        SerialExecutor::builder().build().unwrap()
    }

    #[test]
    fn new_executor_is_created_and_rejects() {
        let executor = SerialExecutor::new(ExecutorConfig::default());
        assert_eq!(executor.state(), ExecutorState::Created);

        let err = executor.submit(|| {}).unwrap_err();
        assert_eq!(err.state(), ExecutorState::Created);
        assert_eq!(executor.stats().rejected, 1);
    }

    #[test]
    fn start_is_idempotent() {
        let executor = started();
        assert_eq!(executor.state(), ExecutorState::Running);
        executor.start().unwrap();
        assert_eq!(executor.state(), ExecutorState::Running);
    }

    #[test]
    fn start_after_shutdown_is_rejected() {
        let executor = started();
        executor.shutdown(true);
        executor.join();

        assert!(matches!(executor.start(), Err(Error::Rejected(_))));
    }

    #[test]
    fn runs_tasks_on_the_named_worker_thread() {
        let executor = SerialExecutor::builder()
            .thread_name("unit-writer")
            .build()
            .unwrap();

        let (tx, rx) = mpsc::channel();
        executor
            .submit(move || {
                let name = thread::current().name().map(str::to_string);
                tx.send(name).unwrap();
            })
            .unwrap();

        assert_eq!(rx.recv().unwrap().as_deref(), Some("unit-writer"));
        assert!(!executor.is_worker_thread());
    }

    #[test]
    fn spawn_returns_value() {
        let executor = started();
        let handle = executor.spawn(|| 2 + 2).unwrap();
        assert_eq!(handle.wait().unwrap(), 4);
    }

    #[test]
    fn is_worker_thread_inside_task() {
        let executor = Arc::new(started());
        let inner = executor.clone();

        let on_worker = executor.spawn(move || inner.is_worker_thread()).unwrap();
        assert!(on_worker.wait().unwrap());
    }

    #[test]
    fn shutdown_from_inside_task_does_not_deadlock() {
        let executor = Arc::new(started());
        let inner = executor.clone();
        let ran_after = Arc::new(AtomicBool::new(false));
        let flag = ran_after.clone();
        let (go_tx, go_rx) = mpsc::channel::<()>();

        executor
            .submit(move || {
                go_rx.recv().unwrap();
                inner.shutdown(true);
                inner.join();
            })
            .unwrap();
        executor
            .submit(move || flag.store(true, Ordering::SeqCst))
            .unwrap();
        go_tx.send(()).unwrap();

        assert!(executor.await_termination(Duration::from_secs(5)));
        assert!(ran_after.load(Ordering::SeqCst));
    }

    #[test]
    fn drop_drains_by_default() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let executor = started();
            for _ in 0..10 {
                let count = count.clone();
                executor
                    .submit(move || {
                        thread::sleep(Duration::from_millis(1));
                        count.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
            }
        }
        assert_eq!(count.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn stats_add_up_after_stop() {
        let executor = started();
        let gate = Arc::new(StdMutex::new(()));
        let held = gate.lock().unwrap();

        let g = gate.clone();
        executor
            .submit(move || {
                let _unused = g.lock();
            })
            .unwrap();
        executor.submit(panicking()).unwrap();
        executor.submit(|| {}).unwrap();

        // First task is blocked on the gate, so the other two are still queued.
        thread::sleep(Duration::from_millis(20));
        executor.shutdown(false);
        drop(held);
        executor.join();

        let _ = executor.submit(|| {});

        let stats = executor.stats();
        assert_eq!(stats.state, ExecutorState::Stopped);
        assert_eq!(stats.submitted, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.faulted, 0);
        assert_eq!(stats.discarded, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.pending, 0);
    }
}
