//! Output directory and image persistence
//!
//! Files are named after the Unix timestamp of generation; two requests in
//! the same second write the same name and the later one wins.

use super::error::WordCloudError;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Suffix counter for staging files, so concurrent writes never share one
static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

pub fn file_name_for(epoch_secs: i64) -> String {
    format!("wordcloud_{epoch_secs}.png")
}

#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Create the directory (recursively, idempotent) and resolve it to an
    /// absolute path. Called once at startup.
    pub fn prepare(path: impl AsRef<Path>) -> Result<Self, WordCloudError> {
        let path = path.as_ref();
        let dir_error = |source| WordCloudError::OutputDir {
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(path).map_err(dir_error)?;
        let path = fs::canonicalize(path).map_err(dir_error)?;

        let dir = Self { path };
        dir.ensure()?;
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Per-request check. Recreates a vanished directory and reports whether
    /// it had to; a directory this process cannot write into is an error.
    pub fn ensure(&self) -> Result<bool, WordCloudError> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => self.check_writable().map(|()| false),
            Ok(_) => Err(WordCloudError::OutputDir {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::AlreadyExists, "not a directory"),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.path).map_err(|source| WordCloudError::OutputDir {
                    path: self.path.clone(),
                    source,
                })?;
                Ok(true)
            }
            Err(source) => Err(WordCloudError::OutputDir {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Hidden, per-call unique path next to `file_name`
    fn staging_path(&self, file_name: &str) -> PathBuf {
        let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
        self.path
            .join(format!(".{file_name}.{}.{seq}.tmp", std::process::id()))
    }

    /// Create and remove a scratch file; mode bits do not reflect ownership,
    /// ACLs or root
    fn check_writable(&self) -> Result<(), WordCloudError> {
        let scratch = self.staging_path("write-check");
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&scratch)
            .map_err(|_| WordCloudError::NotWritable(self.path.clone()))?;
        let _ = fs::remove_file(&scratch);
        Ok(())
    }

    /// Write `bytes` as `file_name` via a temp file and rename, so a failed
    /// write never leaves a truncated image under the final name.
    pub fn persist(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, WordCloudError> {
        let target = self.path.join(file_name);
        let staging = self.staging_path(file_name);

        let written = fs::write(&staging, bytes).and_then(|()| fs::rename(&staging, &target));
        if let Err(source) = written {
            let _ = fs::remove_file(&staging);
            return Err(WordCloudError::Write {
                path: target,
                source,
            });
        }
        Ok(target)
    }

    /// Size of a persisted file; a missing file is an integrity failure
    pub fn verify(path: &Path) -> Result<u64, WordCloudError> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(WordCloudError::NotPersisted(path.to_path_buf())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(WordCloudError::NotPersisted(path.to_path_buf()))
            }
            Err(source) => Err(WordCloudError::Write {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
pub(crate) fn scratch_dir(label: &str) -> PathBuf {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let n = NEXT.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("wordcloud-test-{}-{label}-{n}", std::process::id()))
}
