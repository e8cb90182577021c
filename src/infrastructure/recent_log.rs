//! Bounded in-memory buffer of recent log lines.
//!
//! [`RecentLog`] implements [`MakeWriter`], so it plugs into
//! `tracing_subscriber::fmt::layer().with_writer(..)` next to the stdout
//! layer. It is created once at startup, shared through
//! [`crate::state::AppState`], and safe to clear at any time.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

pub const DEFAULT_CAPACITY: usize = 100;
/// Number of lines returned by [`RecentLog::recent`].
pub const READ_LIMIT: usize = 50;

/// Ring buffer holding the newest formatted log lines.
#[derive(Clone, Debug)]
pub struct RecentLog {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl RecentLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    // A poisoned lock only means a writer panicked mid-push; the buffer is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends a line, evicting the oldest when full.
    pub fn push(&self, line: impl Into<String>) {
        let mut lines = self.lock();
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line.into());
    }

    /// Up to [`READ_LIMIT`] newest lines, oldest first.
    pub fn recent(&self) -> Vec<String> {
        let lines = self.lock();
        let skip = lines.len().saturating_sub(READ_LIMIT);
        lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for RecentLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Per-event writer; the collected bytes become one line on drop.
pub struct RecentLogWriter {
    log: RecentLog,
    buffer: Vec<u8>,
}

impl io::Write for RecentLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for RecentLogWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if !line.is_empty() {
            self.log.push(line);
        }
    }
}

impl<'a> MakeWriter<'a> for RecentLog {
    type Writer = RecentLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RecentLogWriter {
            log: self.clone(),
            buffer: Vec::new(),
        }
    }
}
