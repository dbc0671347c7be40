//! # ordo
//!
//! A serial task executor: one dedicated worker thread consuming one ordered,
//! unbounded queue. Any number of threads submit work; every task runs on the
//! worker thread, alone, in the order the submissions were accepted.
//!
//! ```rust,ignore
//! use ordo::runtime;
//!
//! runtime::submit(|| println!("runs on the serial worker"))?;
//!
//! let handle = runtime::spawn(|| 6 * 7)?;
//! assert_eq!(handle.wait()?, 42);
//!
//! runtime::shutdown(true);
//! ```
//!
//! ## Modules
//!
//! - [`runtime`] - the executor, the process-wide instance and task handles
//! - [`fs`] - file segment writes serialized through an executor
//!
//! The [`serial`] attribute turns a function into a submission to the global
//! executor.

pub mod fs;
pub mod runtime;

pub use ordo_macros::*;
pub use runtime::{RejectedError, SerialExecutor, TaskHandle};
