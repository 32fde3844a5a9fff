//! Log writer module
//!
//! Thread-safe log writing to stdout/stderr or to size-rotated files.
//! File targets can be reopened at runtime (SIGUSR1).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Severity, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Parse a configured level name; unknown names fall back to `Info`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// Size limits for file targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    pub max_bytes: u64,
    pub backup_count: usize,
}

/// Log file that rolls over to `<path>.1 .. <path>.N` once it grows past
/// `max_bytes`. A `max_bytes` of 0 disables rotation.
pub struct RotatingFile {
    path: PathBuf,
    file: File,
    written: u64,
    rotation: Rotation,
}

impl RotatingFile {
    pub fn open(path: impl Into<PathBuf>, rotation: Rotation) -> io::Result<Self> {
        let path = path.into();
        let file = open_log_file(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            file,
            written,
            rotation,
        })
    }

    pub fn write_line(&mut self, message: &str) -> io::Result<()> {
        let len = message.len() as u64 + 1;
        if self.rotation.max_bytes > 0 && self.written > 0 && self.written + len > self.rotation.max_bytes {
            self.rotate()?;
        }
        writeln!(self.file, "{message}")?;
        self.written += len;
        Ok(())
    }

    /// Reopen the file at the same path, e.g. after an external move
    pub fn reopen(&mut self) -> io::Result<()> {
        self.file = open_log_file(&self.path)?;
        self.written = self.file.metadata()?.len();
        Ok(())
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let count = self.rotation.backup_count;
        if count == 0 {
            // No backups: truncate in place
            self.file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let _ = fs::remove_file(self.backup_path(count));
        for n in (1..count).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;
        self.reopen()
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }
}

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to a rotating file
    File(RotatingFile),
}

/// Thread-safe log writer
pub struct LogWriter {
    /// Access and info target
    access: Mutex<LogTarget>,
    /// Warning and error target
    error: Mutex<LogTarget>,
    level: Level,
}

impl LogWriter {
    fn new(
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
        rotation: Rotation,
        level: Level,
    ) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(RotatingFile::open(path, rotation)?),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(RotatingFile::open(path, rotation)?),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            access: Mutex::new(access),
            error: Mutex::new(error),
            level,
        })
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Write to access log
    pub fn write_access(&self, message: &str) {
        write_to_target(&mut lock(&self.access), message);
    }

    /// Write to error log
    pub fn write_error(&self, message: &str) {
        write_to_target(&mut lock(&self.error), message);
    }

    /// Write info message (to access log target)
    pub fn write_info(&self, message: &str) {
        write_to_target(&mut lock(&self.access), message);
    }

    /// Reopen file targets in place
    pub fn reopen(&self) -> io::Result<()> {
        for target in [&self.access, &self.error] {
            if let LogTarget::File(file) = &mut *lock(target) {
                file.reopen()?;
            }
        }
        Ok(())
    }
}

/// A panic while holding the lock leaves the target usable
fn lock(target: &Mutex<LogTarget>) -> MutexGuard<'_, LogTarget> {
    target.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Open or create a log file for appending
fn open_log_file(path: &Path) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write message to log target
fn write_to_target(target: &mut LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => {
            println!("{message}");
        }
        LogTarget::Stderr => {
            eprintln!("{message}");
        }
        LogTarget::File(file) => {
            if let Err(e) = file.write_line(message) {
                eprintln!("[LOGGER] Failed to write {}: {e}", file.path.display());
                eprintln!("{message}");
            }
        }
    }
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
    rotation: Rotation,
    level: Level,
) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file, rotation, level)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if initialized
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wordcloud-log-{}-{label}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_level_parse_and_order() {
        assert_eq!(Level::parse("WARNING"), Level::Warn);
        assert_eq!(Level::parse("bogus"), Level::Info);
        assert!(Level::Error > Level::Info);
        assert!(Level::Debug < Level::Info);
    }

    #[test]
    fn test_rotation_keeps_backup_count() {
        let dir = scratch("rotate");
        let path = dir.join("app.log");
        let rotation = Rotation {
            max_bytes: 20,
            backup_count: 2,
        };
        let mut file = RotatingFile::open(&path, rotation).unwrap();
        for i in 0..6 {
            file.write_line(&format!("line number {i}")).unwrap();
        }

        assert!(path.exists());
        assert!(dir.join("app.log.1").exists());
        assert!(dir.join("app.log.2").exists());
        assert!(!dir.join("app.log.3").exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "line number 5\n");
        assert_eq!(fs::read_to_string(dir.join("app.log.1")).unwrap(), "line number 4\n");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_no_backups_truncates_in_place() {
        let dir = scratch("truncate");
        let path = dir.join("app.log");
        let rotation = Rotation {
            max_bytes: 10,
            backup_count: 0,
        };
        let mut file = RotatingFile::open(&path, rotation).unwrap();
        file.write_line("first line").unwrap();
        file.write_line("second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        assert!(!dir.join("app.log.1").exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_reopen_after_external_move() {
        let dir = scratch("reopen");
        let path = dir.join("app.log");
        let rotation = Rotation {
            max_bytes: 0,
            backup_count: 0,
        };
        let mut file = RotatingFile::open(&path, rotation).unwrap();
        file.write_line("before").unwrap();
        fs::rename(&path, dir.join("moved.log")).unwrap();
        file.reopen().unwrap();
        file.write_line("after").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "after\n");
        assert_eq!(fs::read_to_string(dir.join("moved.log")).unwrap(), "before\n");
        let _ = fs::remove_dir_all(dir);
    }
}
