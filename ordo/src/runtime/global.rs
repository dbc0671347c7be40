//! The process-wide executor.
//!
//! Created lazily by the first call that needs it and never dropped. Every
//! caller in the process shares its single worker thread.

use crate::runtime::builder::ExecutorBuilder;
use crate::runtime::error::{Error, RejectedError};
use crate::runtime::executor::SerialExecutor;
use crate::runtime::handle::TaskHandle;
use crate::runtime::task::Task;
use std::sync::OnceLock;
use tracing::error;

static GLOBAL_EXECUTOR: OnceLock<SerialExecutor> = OnceLock::new();

/// Returns the global executor, building and starting it with the default
/// configuration on first use.
///
/// Concurrent first calls are safe: exactly one executor and one worker thread
/// are ever created.
pub fn get_or_init() -> &'static SerialExecutor {
    GLOBAL_EXECUTOR.get_or_init(|| {
        let executor = ExecutorBuilder::new().build_unstarted();
        if let Err(e) = executor.start() {
            error!(error = %e, "global executor failed to start; submissions will be rejected");
        }
        executor
    })
}

/// Installs the global executor from `builder` and starts it.
///
/// Fails with [`Error::AlreadyInitialized`] if the global executor already
/// exists, whether from an earlier `init` or from [`get_or_init`]. When
/// several threads race, exactly one of them installs its builder.
pub fn init(builder: ExecutorBuilder) -> Result<&'static SerialExecutor, Error> {
    let mut started = None;

    let executor = GLOBAL_EXECUTOR.get_or_init(|| {
        let executor = builder.build_unstarted();
        started = Some(executor.start());
        executor
    });

    match started {
        None => Err(Error::AlreadyInitialized),
        Some(Ok(())) => Ok(executor),
        Some(Err(e)) => Err(e),
    }
}

/// The global executor, if it has been created.
pub fn try_get() -> Option<&'static SerialExecutor> {
    GLOBAL_EXECUTOR.get()
}

// This is what the macro will call
pub fn submit<T>(task: T) -> Result<(), RejectedError>
where
    T: Task,
{
    get_or_init().submit(task)
}

pub fn spawn<F, T>(f: F) -> Result<TaskHandle<T>, RejectedError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    get_or_init().spawn(f)
}

/// Shuts the global executor down.
///
/// This is permanent for the life of the process: the global executor cannot
/// be replaced, so every later submission is rejected. If nothing has created
/// it yet, it is installed unstarted and goes straight to `Stopped`.
pub fn shutdown(drain: bool) {
    GLOBAL_EXECUTOR
        .get_or_init(|| ExecutorBuilder::new().build_unstarted())
        .shutdown(drain);
}
