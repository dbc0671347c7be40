mod common;

use ordo::runtime::{self, Error};
use std::sync::mpsc;
use std::thread;

#[ordo::serial]
fn record_thread(tx: mpsc::Sender<Option<String>>) {
    tx.send(thread::current().name().map(str::to_string)).unwrap();
}

#[ordo::serial]
fn checksum(bytes: Vec<u8>) -> u32 {
    bytes.iter().map(|b| *b as u32).sum()
}

#[ordo::serial]
fn describe<T: std::fmt::Debug + Send + 'static>(value: T) -> String {
    format!("{value:?}")
}

#[ordo::serial]
fn explode() -> u8 {
    panic!("macro task failed")
}

#[test]
fn test_unit_function_runs_on_global_worker() {
    common::init_tracing();
    let (tx, rx) = mpsc::channel();

    record_thread(tx).unwrap();

    assert_eq!(rx.recv().unwrap().as_deref(), Some("ordo-serial"));
}

#[test]
fn test_value_function_returns_handle() {
    let handle = checksum(vec![1, 2, 3, 250]).unwrap();
    assert_eq!(handle.wait().unwrap(), 256);

    let handle = describe((1, "two")).unwrap();
    assert_eq!(handle.wait().unwrap(), "(1, \"two\")");
}

#[test]
fn test_panicking_function_yields_fault() {
    let result = explode().unwrap().wait();
    assert!(matches!(result, Err(Error::Fault(_))));

    // The global worker is still serving.
    assert_eq!(checksum(vec![7]).unwrap().wait().unwrap(), 7);
    assert!(runtime::try_get().is_some());
}
