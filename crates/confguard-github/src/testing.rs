//! Test helpers: capture log output produced while exercising the guard.

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Captured log output for the current thread.
///
/// Installed as the thread's default subscriber at `DEBUG`, so it works with
/// `#[tokio::test]` on the current-thread runtime. Output is plain text
/// without colors or timestamps, one event per line.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Install a capturing subscriber until the returned guard is dropped.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    /// All captured lines.
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Lines logged at `level` that contain `needle`.
    pub fn matching(&self, level: Level, needle: &str) -> Vec<String> {
        let level = level.to_string();
        self.lines()
            .into_iter()
            .filter(|line| line.split_whitespace().next() == Some(level.as_str()))
            .filter(|line| line.contains(needle))
            .collect()
    }

    /// Number of lines logged at `level` that contain `needle`.
    pub fn count(&self, level: Level, needle: &str) -> usize {
        self.matching(level, needle).len()
    }
}

/// Writer handed to the subscriber for each event.
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, error, info};

    #[test]
    fn test_capture_by_level() {
        let (logs, _guard) = LogCapture::install();

        let url = "https://example.com/c/1";
        info!(commit = %url, "Repository updated successfully");
        error!("Sender is not authorized to modify guarded files");
        debug!("Commit sha error.");

        assert_eq!(logs.count(Level::INFO, "Repository updated successfully"), 1);
        assert_eq!(logs.count(Level::ERROR, "Sender is not authorized"), 1);
        assert_eq!(logs.count(Level::DEBUG, "Commit sha error."), 1);
        assert_eq!(logs.count(Level::INFO, "Sender is not authorized"), 0);
        assert!(logs.matching(Level::INFO, "Repository updated")[0]
            .contains("commit=https://example.com/c/1"));
    }
}
