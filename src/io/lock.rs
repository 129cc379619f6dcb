use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Name of the lock file inside the board dir
pub const LOCK_FILE: &str = ".lock";

/// How long writers wait for the board by default
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another ib process may be writing")]
    Timeout { path: PathBuf },
}

/// Exclusive hold on a board while `ideas.json` is read, changed and
/// written back. Released on drop.
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Lock the board in `board_dir`, retrying until `timeout` has passed.
    pub fn acquire(board_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = board_dir.join(LOCK_FILE);
        let file = open_lock_file(&path)?;

        let deadline = Instant::now() + timeout;
        while !lock_exclusive(&file) {
            if Instant::now() >= deadline {
                log::warn!("gave up waiting for {}", path.display());
                return Err(LockError::Timeout { path });
            }
            thread::sleep(RETRY_INTERVAL);
        }

        log::debug!("locked {}", path.display());
        Ok(FileLock { file, path })
    }

    pub fn acquire_default(board_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(board_dir, DEFAULT_LOCK_TIMEOUT)
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        unlock(&self.file);
        let _ = fs::remove_file(&self.path);
    }
}

fn open_lock_file(path: &Path) -> Result<File, LockError> {
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .map_err(|source| LockError::CreateError {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the fd belongs to `file`, which outlives the call
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(unix)]
fn unlock(file: &File) {
    use std::os::unix::io::AsRawFd;
    // SAFETY: as above
    unsafe {
        libc::flock(file.as_raw_fd(), libc::LOCK_UN);
    }
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> bool {
    true
}

#[cfg(not(unix))]
fn unlock(_file: &File) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_released_on_drop() {
        let tmp = TempDir::new().unwrap();
        let lock = FileLock::acquire_default(tmp.path()).unwrap();
        assert!(tmp.path().join(LOCK_FILE).exists());
        drop(lock);
        assert!(!tmp.path().join(LOCK_FILE).exists());
        assert!(FileLock::acquire_default(tmp.path()).is_ok());
    }

    #[test]
    fn test_lock_contention_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = FileLock::acquire_default(tmp.path()).unwrap();
        let second = FileLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }

    #[test]
    fn test_missing_board_dir_is_create_error() {
        let tmp = TempDir::new().unwrap();
        let result = FileLock::acquire_default(&tmp.path().join("missing"));
        assert!(matches!(result, Err(LockError::CreateError { .. })));
    }
}
