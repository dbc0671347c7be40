use ordo::fs::{WriteSegment, submit_write};
use ordo::runtime::SerialExecutor;
use std::sync::Arc;
use std::thread;

const SEGMENT: usize = 1024;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("ordo=trace").init();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("demo.bin");
    let executor = Arc::new(SerialExecutor::builder().thread_name("demo-writer").build()?);

    println!("Writing 16 segments from 4 threads into {}", path.display());

    let producers: Vec<_> = (0..4)
        .map(|conn| {
            let executor = executor.clone();
            let path = path.clone();
            thread::spawn(move || {
                (conn..16)
                    .step_by(4)
                    .map(|index| {
                        let fill = vec![b'a' + index as u8; SEGMENT];
                        let segment = WriteSegment::new(&path, (index * SEGMENT) as u64, fill);
                        submit_write(&executor, segment)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
        })
        .collect();

    let mut written = 0;
    for producer in producers {
        let handles = producer.join().map_err(|_| "producer thread panicked")??;
        for handle in handles {
            written += handle.wait()??;
        }
    }

    executor.shutdown(true);
    executor.join();

    println!("Wrote {} bytes", written);
    println!("Stats: {:?}", executor.stats());

    Ok(())
}
