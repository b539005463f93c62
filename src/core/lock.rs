//! Locked full-file writes
//!
//! Every table is saved through [`write_with_lock`]: the existing file is
//! opened, an exclusive `flock(2)` lock is taken on the open file description,
//! the file is truncated and rewritten, and the lock is released when the
//! guard drops. Readers do not lock, so a reader in another process can
//! observe a file mid-write.

use crate::error::{AccountError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Overwrites `path` with `data` while holding an exclusive lock
///
/// The file must already exist; it is never created, so its permission bits
/// are kept. A crash mid-write can leave a partially written file.
///
/// # Errors
///
/// - `Io` if the file cannot be opened
/// - `Lock` if the exclusive lock cannot be acquired
/// - `Write` if truncating or writing fails
///
/// If releasing the lock fails the process aborts: an account file left
/// locked blocks every other account tool on the system.
pub fn write_with_lock(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    write_locked(path.as_ref(), data, |file, data| {
        file.write_all(data)?;
        file.flush()
    })
}

/// Runs `write` against the locked, truncated file at `path`
fn write_locked<F>(path: &Path, data: &[u8], write: F) -> Result<()>
where
    F: FnOnce(&mut File, &[u8]) -> io::Result<()>,
{
    let file = OpenOptions::new().write(true).open(path)?;
    let mut locked = LockedFile::acquire(file, path)?;

    let result = locked
        .file
        .set_len(0)
        .and_then(|()| write(&mut locked.file, data))
        .map_err(|source| AccountError::Write {
            path: path.to_path_buf(),
            source,
        });

    if result.is_ok() {
        debug!("Wrote {} bytes to {}", data.len(), path.display());
    }

    // `locked` drops here and releases the lock on every path
    result
}

/// An open file holding an exclusive `flock` until dropped
struct LockedFile {
    file: File,
    path: PathBuf,
}

impl LockedFile {
    fn acquire(file: File, path: &Path) -> Result<Self> {
        flock(&file, libc::LOCK_EX).map_err(|source| AccountError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Acquired exclusive lock on {}", path.display());

        Ok(LockedFile {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if let Err(err) = flock(&self.file, libc::LOCK_UN) {
            error!("Unable to unlock {}: {}", self.path.display(), err);
            std::process::abort();
        }
        debug!("Released lock on {}", self.path.display());
    }
}

fn flock(file: &File, operation: libc::c_int) -> io::Result<()> {
    loop {
        // SAFETY: the descriptor belongs to `file`, which outlives the call.
        let result = unsafe { libc::flock(file.as_raw_fd(), operation) };
        if result == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}
