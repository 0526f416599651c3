// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Destinations for formatted log lines.

use std::fmt;
use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;

mod testing;

pub use self::testing::Buffer;
pub use self::testing::Testing;

/// A shared, byte-accepting destination for log lines.
///
/// Cloning a [`Sink`] shares the underlying writer. A logger and every logger derived from it
/// write to the same sink, and each line is written as a whole while holding the sink's lock,
/// so lines from different loggers or threads never interleave.
///
/// # Examples
///
/// ```
/// use logtag::Sink;
///
/// let stderr = Sink::stderr();
/// let file = Sink::new(tempfile::tempfile().unwrap());
/// ```
#[derive(Clone)]
pub struct Sink {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

impl Default for Sink {
    fn default() -> Self {
        Sink::stderr()
    }
}

impl Sink {
    /// Create a sink over the given writer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Create a sink that writes to the standard error of the process.
    pub fn stderr() -> Self {
        Sink::new(io::stderr())
    }

    /// Create a sink that writes to the standard output of the process.
    pub fn stdout() -> Self {
        Sink::new(io::stdout())
    }

    /// Create a sink whose output is captured by the test harness.
    ///
    /// See [`Testing`].
    pub fn testing() -> Self {
        Sink::new(Testing::default())
    }

    /// Write one complete line to the sink.
    ///
    /// The line is written with a single `write_all` under the sink's lock. Write errors are
    /// returned as they are and never retried.
    pub fn write_line(&self, line: &[u8]) -> Result<(), Error> {
        let mut writer = self.lock();
        writer.write_all(line).map_err(Error::from_sink)
    }

    /// Flush any buffered bytes of the underlying writer.
    pub fn flush(&self) -> Result<(), Error> {
        self.lock().flush().map_err(Error::from_sink)
    }

    /// Whether two sinks share the same underlying writer.
    pub fn same_as(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.writer, &other.writer)
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        // a panic while writing leaves at worst a partial line; keep writing afterwards
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn clones_share_the_writer() {
        let buffer = Buffer::new();
        let sink = Sink::new(buffer.clone());
        let shared = sink.clone();

        sink.write_line(b"first\n").unwrap();
        shared.write_line(b"second\n").unwrap();

        assert!(sink.same_as(&shared));
        assert!(!sink.same_as(&Sink::new(Buffer::new())));
        assert_eq!(buffer.contents(), "first\nsecond\n");
    }

    #[test]
    fn write_errors_are_surfaced() {
        let sink = Sink::new(Broken);

        let err = sink.write_line(b"line\n").unwrap_err();
        assert_eq!(err.message(), "failed to write to sink");
        assert_eq!(err.io_error().unwrap().kind(), io::ErrorKind::BrokenPipe);

        let err = sink.flush().unwrap_err();
        assert_eq!(err.io_error().unwrap().kind(), io::ErrorKind::BrokenPipe);
    }
}
