//! Serialized file writes.
//!
//! Many producers (for example the connections of a segmented download) hand
//! byte ranges of a file to the executor; every disk write then happens on the
//! executor's worker thread, one after another, in submission order.

mod segment;

pub use segment::{WriteSegment, async_write, submit_write};
