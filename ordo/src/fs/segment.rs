use crate::runtime::{self, RejectedError, SerialExecutor, TaskHandle};

use std::fs::OpenOptions;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// A byte range to write into a file at a fixed offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSegment {
    path: PathBuf,
    offset: u64,
    data: Vec<u8>,
}

impl WriteSegment {
    pub fn new(path: impl Into<PathBuf>, offset: u64, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            offset,
            data: data.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Writes the segment synchronously on the calling thread.
    ///
    /// The file is created if missing and never truncated, so segments may
    /// arrive in any order. Writing past the current end leaves a zero-filled
    /// gap until the missing range is written. Returns the number of bytes
    /// written.
    pub fn write(&self) -> io::Result<u64> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        file.seek(SeekFrom::Start(self.offset))?;
        file.write_all(&self.data)?;
        file.flush()?;

        Ok(self.data.len() as u64)
    }
}

/// Queues `segment` on `executor`.
///
/// I/O errors are logged and delivered through the handle; they do not count
/// as task faults.
pub fn submit_write(
    executor: &SerialExecutor,
    segment: WriteSegment,
) -> Result<TaskHandle<io::Result<u64>>, RejectedError> {
    executor.spawn(move || write_logged(&segment))
}

/// Queues `segment` on the global executor.
pub fn async_write(segment: WriteSegment) -> Result<TaskHandle<io::Result<u64>>, RejectedError> {
    runtime::spawn(move || write_logged(&segment))
}

fn write_logged(segment: &WriteSegment) -> io::Result<u64> {
    match segment.write() {
        Ok(written) => {
            trace!(path = %segment.path.display(), offset = segment.offset, written, "segment written");
            Ok(written)
        }
        Err(e) => {
            warn!(path = %segment.path.display(), offset = segment.offset, error = %e, "segment write failed");
            Err(e)
        }
    }
}
