//! Staged, all-or-nothing file creation.
//!
//! Bytes are written to a hidden sibling (`.<name>.part`) and only linked to
//! their final name once they are complete and synced. A staging file is
//! removed whenever its [`StagingGuard`] goes away, including on unwind, so
//! the final name only ever shows complete content.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Prefix shared by every staging file; listing and key validation skip it
pub const STAGING_PREFIX: char = '.';

const STAGING_SUFFIX: &str = ".part";

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("destination already exists")]
    AlreadyExists,

    #[error("caller went away before the file was published")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Hidden sibling of `dest` used while its content is being written
pub fn staging_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!("{}{}{}", STAGING_PREFIX, name, STAGING_SUFFIX))
}

/// Removes the staging file it owns when dropped
#[derive(Debug)]
pub struct StagingGuard {
    path: PathBuf,
}

impl StagingGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove staging file"
            ),
        }
    }
}

/// Write `data` to a new file at `dest`.
///
/// Blocking; run it on the blocking pool. `is_cancelled` is consulted after the
/// bytes are synced and before they are published: when it returns true the
/// staged bytes are discarded and `dest` is never created. An existing `dest`
/// is never overwritten.
pub fn write_exclusive(
    dest: &Path,
    data: &[u8],
    is_cancelled: impl Fn() -> bool,
) -> Result<(), PublishError> {
    if dest.exists() {
        return Err(PublishError::AlreadyExists);
    }

    let staging = staging_path_for(dest);
    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&staging)
    {
        Ok(file) => file,
        // Another writer owns this staging file; leave it alone
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(PublishError::AlreadyExists)
        }
        Err(e) => return Err(e.into()),
    };
    let guard = StagingGuard { path: staging };

    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    if is_cancelled() {
        return Err(PublishError::Cancelled);
    }

    match fs::hard_link(guard.path(), dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(PublishError::AlreadyExists),
        Err(e) => Err(e.into()),
    }
}
