mod common;

use ordo::fs::{WriteSegment, async_write, submit_write};
use ordo::runtime::SerialExecutor;
use std::fs;
use std::sync::Arc;
use std::thread;

const SEGMENT: usize = 64;

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn test_segments_from_many_threads_assemble_the_file() {
    common::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("download.part");
    let data = Arc::new(payload(SEGMENT * 32));
    let executor = Arc::new(SerialExecutor::builder().thread_name("segment-writer").build().unwrap());

    // Four "connections", each owning an interleaved set of segments, written back to front.
    let producers: Vec<_> = (0..4)
        .map(|conn| {
            let executor = executor.clone();
            let data = data.clone();
            let path = path.clone();
            thread::spawn(move || {
                let mut handles = Vec::new();
                for index in (conn..32).step_by(4).rev() {
                    let start = index * SEGMENT;
                    let segment = WriteSegment::new(&path, start as u64, &data[start..start + SEGMENT]);
                    handles.push(submit_write(&executor, segment).unwrap());
                }
                handles
                    .into_iter()
                    .map(|h| h.wait().unwrap().unwrap())
                    .sum::<u64>()
            })
        })
        .collect();

    let written: u64 = producers.into_iter().map(|p| p.join().unwrap()).sum();

    executor.shutdown(true);
    executor.join();

    assert_eq!(written, data.len() as u64);
    assert_eq!(fs::read(&path).unwrap(), *data);
    assert_eq!(executor.stats().completed, 32);
}

#[test]
fn test_later_segment_wins_on_overlap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overlap.bin");
    let executor = SerialExecutor::builder().build().unwrap();

    submit_write(&executor, WriteSegment::new(&path, 0, b"aaaaaa".to_vec())).unwrap();
    submit_write(&executor, WriteSegment::new(&path, 2, b"bb".to_vec())).unwrap();
    executor.shutdown(true);
    executor.join();

    assert_eq!(fs::read(&path).unwrap(), b"aabbaa");
}

#[test]
fn test_async_write_uses_global_executor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("global.bin");

    let handle = async_write(WriteSegment::new(&path, 0, b"hello".to_vec())).unwrap();

    assert_eq!(handle.wait().unwrap().unwrap(), 5);
    assert_eq!(fs::read(&path).unwrap(), b"hello");
}
