pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod global;
pub mod handle;
pub(crate) mod queue;
pub mod state;
pub mod stats;
pub mod task;

pub use builder::ExecutorBuilder;
pub use config::ExecutorConfig;
pub use context::current_task;
pub use error::{Error, RejectedError, TaskFault};
pub use executor::SerialExecutor;
pub use global::{get_or_init, init, shutdown, spawn, submit, try_get};
pub use handle::TaskHandle;
pub use state::ExecutorState;
pub use stats::ExecutorStats;
pub use task::{Task, TaskId};
