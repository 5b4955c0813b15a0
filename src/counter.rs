//! The file-backed visit counter.
//!
//! State is a single non-negative integer stored as decimal text. The file is
//! assumed to exist with valid content; a missing or non-numeric file is an
//! error that fails the in-flight request rather than being defaulted away.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;

/// Persistent counter of requests that hit a monitored resource prefix.
///
/// All file access goes through one mutex: the read-modify-write in
/// [`increment_and_persist`](Self::increment_and_persist) cannot interleave
/// with another increment and undercount, and a concurrent [`read`](Self::read)
/// never observes the file mid-truncate.
#[derive(Debug)]
pub struct VisitCounter {
    path: PathBuf,
    file_lock: Mutex<()>,
}

impl VisitCounter {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file_lock: Mutex::new(()),
        }
    }

    /// Read and parse the current value without mutating it.
    pub fn read(&self) -> anyhow::Result<u64> {
        let _guard = self.file_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_locked()
    }

    /// Increment the persisted value by one, overwriting the file.
    pub fn increment_and_persist(&self) -> anyhow::Result<u64> {
        let _guard = self.file_lock.lock().unwrap_or_else(|e| e.into_inner());
        let next = self.read_locked()? + 1;
        fs::write(&self.path, next.to_string())
            .with_context(|| format!("failed to write counter file {}", self.path.display()))?;
        Ok(next)
    }

    fn read_locked(&self) -> anyhow::Result<u64> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read counter file {}", self.path.display()))?;
        raw.trim()
            .parse()
            .with_context(|| format!("counter file {} is not a number", self.path.display()))
    }
}
