use crate::runtime::builder::Callback;
use crate::runtime::context;
use crate::runtime::error::{TaskFault, panic_message};
use crate::runtime::executor::core::Shared;
use crate::runtime::queue::TaskQueue;
use crate::runtime::task::Job;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, info_span, trace, trace_span};

/// Body of the worker thread.
///
/// Loops over the queue until shutdown leaves it empty, then marks the
/// executor `Stopped`. Tasks run one at a time; a panicking task is recorded
/// as a fault and never takes the thread down.
pub(crate) fn run(shared: Arc<Shared>) {
    let _ = shared.worker_thread.set(thread::current().id());
    let _exit = ExitGuard(&shared.queue);

    let span = info_span!("serial_worker", thread = %shared.config.thread_name);
    let _enter = span.enter();

    run_hook("on_thread_start", shared.hooks.on_thread_start.as_ref());
    debug!("worker started");

    while let Some(job) = shared.queue.pop() {
        execute(&shared, job);
    }

    drop(shared.queue.finish());
    info!(
        completed = shared.counters.completed(),
        faulted = shared.counters.faulted(),
        "worker stopped"
    );

    run_hook("on_thread_stop", shared.hooks.on_thread_stop.as_ref());
}

/// Releases joiners once the worker is done, even if it unwinds.
struct ExitGuard<'a>(&'a TaskQueue);

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        drop(self.0.mark_exited());
    }
}

fn execute(shared: &Shared, job: Job) {
    let (id, seq) = (job.id, job.seq);
    let span = trace_span!("task", task_id = %id, seq);
    let _enter = span.enter();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        context::enter_task(id, seq, || job.run());
    }));

    match outcome {
        Ok(()) => {
            shared.counters.record_completed();
            trace!("task completed");
        }
        Err(payload) => {
            shared.counters.record_faulted();
            let fault = TaskFault::from_panic(id, seq, payload.as_ref());
            error!(task_id = %id, seq, message = %fault.message, "task panicked");

            if let Some(observer) = shared.hooks.on_fault.as_ref() {
                if let Err(p) = panic::catch_unwind(AssertUnwindSafe(|| observer(&fault))) {
                    error!(message = %panic_message(p.as_ref()), "fault observer panicked");
                }
            }
        }
    }
}

fn run_hook(name: &str, hook: Option<&Callback>) {
    let Some(hook) = hook else {
        return;
    };

    if let Err(p) = panic::catch_unwind(AssertUnwindSafe(|| hook())) {
        error!(hook = name, message = %panic_message(p.as_ref()), "lifecycle hook panicked");
    }
}
