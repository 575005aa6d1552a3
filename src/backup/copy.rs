use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;

use std::fs::{File, Metadata};
use std::path::Path;

/// Copies `src` over `dst`, replacing whatever `dst` held before.
///
/// The source has to carry the owner-read bit, otherwise nothing is opened and
/// [`Error::PermissionDenied`] is returned. Both handles are dropped before
/// returning. A failure half way leaves a partially written `dst` behind.
///
/// A `dst` that resolves to `src` itself is refused with
/// [`Error::CreateFailed`] before either file is opened, creating it would
/// truncate the source.
pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(src: P1, dst: P2) -> Result<u64> {
    let (src, dst) = (src.as_ref(), dst.as_ref());

    let metadata = std::fs::metadata(src).map_err(|source| Error::OpenFailed {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })?;
    if !has_read_permission(&metadata) {
        return Err(Error::PermissionDenied {
            path: src.to_path_buf(),
        });
    }

    if is_same_file(src, dst) {
        return Err(Error::CreateFailed {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            source: std::io::Error::other("destination is the source file itself"),
        });
    }

    let mut reader = File::open(src).map_err(|source| Error::OpenFailed {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })?;
    let mut writer = File::create(dst).map_err(|source| Error::CreateFailed {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })?;

    std::io::copy(&mut reader, &mut writer).map_err(|source| Error::CopyFailed {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })
}

fn is_same_file(src: &Path, dst: &Path) -> bool {
    match (src.canonicalize(), dst.canonicalize()) {
        (Ok(src), Ok(dst)) => src == dst,
        _ => false,
    }
}

#[cfg(unix)]
fn has_read_permission(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o400 != 0
}

#[cfg(not(unix))]
fn has_read_permission(_metadata: &Metadata) -> bool {
    true
}
