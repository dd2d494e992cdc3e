//! Log writer module
//!
//! Provides thread-safe log writing to files or stdout/stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use super::Level;

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to file
    File(Mutex<File>),
}

/// Thread-safe log writer
pub struct LogWriter {
    /// Info/access target
    info: LogTarget,
    /// Warning/error target
    error: LogTarget,
    /// Lines below this level are discarded
    min_level: Level,
}

impl LogWriter {
    /// Create a new log writer
    ///
    /// Errors go to `error_log_file` when set, otherwise to `log_file`,
    /// otherwise to stderr.
    fn new(
        log_file: Option<&str>,
        error_log_file: Option<&str>,
        min_level: Level,
    ) -> io::Result<Self> {
        let info = match log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file.or(log_file) {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            info,
            error,
            min_level,
        })
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    /// Write a line to the target for its level
    pub fn write(&self, level: Level, line: &str) {
        if !self.enabled(level) {
            return;
        }
        match level {
            Level::Debug | Level::Info => write_to_target(&self.info, line),
            Level::Warn | Level::Error => write_to_target(&self.error, line),
        }
    }

    /// Write to access log (shares the info target)
    pub fn write_access(&self, line: &str) {
        write_to_target(&self.info, line);
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write message to log target
fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => {
            println!("{message}");
        }
        LogTarget::Stderr => {
            eprintln!("{message}");
        }
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(
    log_file: Option<&str>,
    error_log_file: Option<&str>,
    min_level: Level,
) -> io::Result<()> {
    let writer = LogWriter::new(log_file, error_log_file, min_level)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_targets_and_level_filter() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("nested/squire.log");
        let log_str = log_path.to_str().unwrap();

        let writer = LogWriter::new(Some(log_str), None, Level::Info).unwrap();
        writer.write(Level::Debug, "hidden");
        writer.write(Level::Info, "shown info");
        writer.write(Level::Warn, "shown warning");
        writer.write_access("access line");

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(!content.contains("hidden"));
        assert!(content.contains("shown info"));
        // errors fall back to the main log file
        assert!(content.contains("shown warning"));
        assert!(content.contains("access line"));
    }

    #[test]
    fn test_separate_error_file() {
        let dir = tempfile::tempdir().unwrap();
        let info_path = dir.path().join("info.log");
        let error_path = dir.path().join("error.log");

        let writer = LogWriter::new(
            info_path.to_str(),
            error_path.to_str(),
            Level::Debug,
        )
        .unwrap();
        writer.write(Level::Error, "boom");
        writer.write(Level::Debug, "trace");

        assert!(std::fs::read_to_string(&error_path).unwrap().contains("boom"));
        let info = std::fs::read_to_string(&info_path).unwrap();
        assert!(info.contains("trace"));
        assert!(!info.contains("boom"));
    }
}
