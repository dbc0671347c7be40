//! Shared test helpers

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once per test binary.
///
/// `RUST_LOG` overrides the default `ordo=debug` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ordo=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Thread-safe log of values recorded by tasks, in execution order.
#[derive(Clone, Default)]
pub struct Recorder<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone + Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn record(&self, value: T) {
        self.entries.lock().unwrap().push(value);
    }

    pub fn entries(&self) -> Vec<T> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// A task that panics with `msg`.
pub fn panicking(msg: &'static str) -> impl FnOnce() + Send + 'static {
    move || panic!("{msg}")
}
