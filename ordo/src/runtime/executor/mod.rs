//! The serial executor.
//!
//! - [`core`]: the [`SerialExecutor`] handle, submission and lifecycle,
//! - [`worker`]: the loop run by the single worker thread.
//!
//! Producers push into a shared [`TaskQueue`](crate::runtime::queue::TaskQueue);
//! the worker pops and runs one task at a time, in push order.

pub(crate) mod core;
pub(crate) mod worker;

pub use self::core::SerialExecutor;
