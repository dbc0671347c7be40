mod common;

use ordo::runtime::{self, ExecutorState, SerialExecutor};
use std::collections::HashSet;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

#[test]
fn test_get_or_init_returns_one_instance() {
    common::init_tracing();
    assert!(runtime::try_get().is_none());

    let callers = 32;
    let barrier = Arc::new(Barrier::new(callers));
    let workers = Arc::new(Mutex::new(HashSet::new()));

    let handles: Vec<_> = (0..callers)
        .map(|_| {
            let barrier = barrier.clone();
            let workers = workers.clone();
            thread::spawn(move || {
                barrier.wait();
                let executor = runtime::get_or_init();
                let handle = runtime::spawn(|| thread::current().id()).unwrap();
                workers.lock().unwrap().insert(handle.wait().unwrap());
                executor as *const SerialExecutor as usize
            })
        })
        .collect();

    let instances: HashSet<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(instances.len(), 1);
    assert_eq!(workers.lock().unwrap().len(), 1);

    let global = runtime::try_get().unwrap();
    assert_eq!(global.state(), ExecutorState::Running);
    assert_eq!(global.config().thread_name, "ordo-serial");
    assert_eq!(global.stats().submitted, callers as u64);
}
