//! Directory checks run at the start of every backup.
//!
//! The source directory must already exist, the backup directory is created
//! on demand.

use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;

use std::fs::DirBuilder;
use std::path::Path;

/// Permission bits used when the backup directory has to be created.
pub const BACKUP_DIR_MODE: u32 = 0o755;

/// Fails with [`Error::NotADirectory`] when `dir` is missing or is not a directory.
///
/// Both cases produce the same error on purpose, callers cannot tell them apart.
pub fn validate_dir_exist<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    if dir.is_dir() {
        Ok(())
    } else {
        Err(Error::NotADirectory {
            path: dir.to_path_buf(),
        })
    }
}

/// Creates `dir` and any missing parents, doing nothing if it is already a directory.
pub fn validate_dir_exist_or_created<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(BACKUP_DIR_MODE);
    }

    builder
        .create(dir)
        .map_err(|source| Error::DirectoryCreateFailed {
            path: dir.to_path_buf(),
            source,
        })?;
    tracing::debug!("Created backup directory {:?}", dir);

    Ok(())
}

/// Fails with [`Error::SameDirectory`] when both paths resolve to one directory.
pub fn validate_distinct_dirs<P1: AsRef<Path>, P2: AsRef<Path>>(src: P1, dst: P2) -> Result<()> {
    let src = src.as_ref().canonicalize()?;
    if dst.as_ref().canonicalize()? == src {
        return Err(Error::SameDirectory { path: src });
    }

    Ok(())
}
