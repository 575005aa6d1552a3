use crate::backup::copy::copy_file;
use crate::backup::filter::FileFilter;
use crate::backup::function_path;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::{convert_error_vec, Result};
use crate::backup::result_error::{AddFunctionName, AddMsg};

use function_name::named;
use walkdir::{DirEntry, WalkDir};

use std::path::{Path, PathBuf};

/// What a walk does once a file fails to copy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop walking at the first failure
    #[default]
    Stop,
    /// Log the failure, keep walking, report every failure at the end
    KeepGoing,
}

impl From<bool> for FailurePolicy {
    fn from(keep_going: bool) -> Self {
        if keep_going {
            Self::KeepGoing
        } else {
            Self::Stop
        }
    }
}

/// Outcome of one walk
///
/// `copied` is meaningful even when `error` is set, it counts the files that
/// made it into the backup directory before (or around) the failures.
#[derive(Debug, Default)]
pub struct CopyTally {
    pub copied: usize,
    pub error: Option<Error>,
}

impl CopyTally {
    pub fn into_result(self) -> Result<usize> {
        match self.error {
            None => Ok(self.copied),
            Some(e) => Err(e),
        }
    }
}

/// Walks `src_dir` recursively and copies every selected regular file into
/// `backup_dir` under its base name alone.
///
/// Entries are visited sorted by file name, so with two files of the same name
/// the one visited last ends up in the backup. A backup directory nested inside
/// `src_dir` is not descended into.
#[named]
pub fn walk_and_copy<P1: AsRef<Path>, P2: AsRef<Path>>(
    src_dir: P1,
    backup_dir: P2,
    filter: &FileFilter,
    policy: FailurePolicy,
) -> CopyTally {
    let (src_dir, backup_dir) = (src_dir.as_ref(), backup_dir.as_ref());
    tracing::debug!(
        "Scanning {:?} into {:?} with filter {}",
        src_dir,
        backup_dir,
        filter
    );

    let backup_canonical = backup_dir.canonicalize().ok();
    let walker = WalkDir::new(src_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|de| !is_backup_dir(de, backup_canonical.as_deref()));

    let mut tally = CopyTally::default();
    let mut errors = Vec::new();
    for res in walker {
        let step = res
            .map_err(|e| {
                tracing::error!("Error accessing path: {e}");
                Error::from(e)
            })
            .and_then(|de| process_dir_entry(de, backup_dir, filter));

        match step {
            Ok(true) => tally.copied += 1,
            Ok(false) => {}
            Err(e) => {
                let e = e.add_fn_name(function_path!());
                match policy {
                    FailurePolicy::Stop => {
                        tally.error = Some(e);
                        return tally;
                    }
                    FailurePolicy::KeepGoing => errors.push(e),
                }
            }
        }
    }

    tally.error = convert_error_vec(errors).err();
    tally
}

fn is_backup_dir(de: &DirEntry, backup_canonical: Option<&Path>) -> bool {
    let Some(backup_canonical) = backup_canonical else {
        return false;
    };
    if de.depth() == 0 || !de.file_type().is_dir() {
        return false;
    }
    let nested = de
        .path()
        .canonicalize()
        .is_ok_and(|p| p == backup_canonical);
    if nested {
        tracing::debug!("Skipping backup directory {:?} inside source", de.path());
    }
    nested
}

/// Returns `Ok(true)` when the entry was copied, `Ok(false)` when it was skipped.
fn process_dir_entry(de: DirEntry, backup_dir: &Path, filter: &FileFilter) -> Result<bool> {
    if !de.file_type().is_file() {
        tracing::trace!("Skipping {:?} not a file", de.path());
        return Ok(false);
    }

    let file_name = de.file_name();
    if !filter.matches(file_name) {
        tracing::trace!("Skipping {:?}, filter {} not match", de.path(), filter);
        return Ok(false);
    }

    let dst: PathBuf = backup_dir.join(file_name);
    if let Err(e) = copy_file(de.path(), &dst) {
        tracing::error!("Error backing up {}: {e}", file_name.to_string_lossy());
        return Err(e.add_msg(format!("Backing up {:?} failed", de.path())));
    }
    tracing::info!("Copied: {} to {}", de.path().display(), dst.display());

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_files(dir: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(dir.join("subdir/deeper"))?;
        std::fs::write(dir.join("file1.txt"), "content1")?;
        std::fs::write(dir.join("file2.json"), "content2")?;
        std::fs::write(dir.join("subdir/file3.txt"), "content3")?;
        std::fs::write(dir.join("subdir/deeper/file4.log"), "content4")?;
        Ok(())
    }

    fn backup_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_walk_without_filter_flattens_everything() {
        let src = TempDir::new().unwrap();
        let backup = TempDir::new().unwrap();
        create_test_files(src.path()).unwrap();

        let copied = walk_and_copy(src.path(), backup.path(), &FileFilter::All, FailurePolicy::Stop)
            .into_result()
            .unwrap();

        assert_eq!(copied, 4);
        assert_eq!(
            backup_names(backup.path()),
            vec!["file1.txt", "file2.json", "file3.txt", "file4.log"]
        );
        assert_eq!(
            std::fs::read_to_string(backup.path().join("file4.log")).unwrap(),
            "content4"
        );
    }

    #[test]
    fn test_walk_with_suffix_filter() {
        let src = TempDir::new().unwrap();
        let backup = TempDir::new().unwrap();
        create_test_files(src.path()).unwrap();

        let filter = FileFilter::Suffix(".txt".into());
        let copied = walk_and_copy(src.path(), backup.path(), &filter, FailurePolicy::Stop)
            .into_result()
            .unwrap();

        assert_eq!(copied, 2);
        assert_eq!(backup_names(backup.path()), vec!["file1.txt", "file3.txt"]);
    }

    #[test]
    fn test_walk_with_name_filter_searches_subdirectories() {
        let src = TempDir::new().unwrap();
        let backup = TempDir::new().unwrap();
        create_test_files(src.path()).unwrap();

        let filter = FileFilter::Name("file4.log".into());
        let copied = walk_and_copy(src.path(), backup.path(), &filter, FailurePolicy::Stop)
            .into_result()
            .unwrap();

        assert_eq!(copied, 1);
        assert_eq!(backup_names(backup.path()), vec!["file4.log"]);
    }

    #[test]
    fn test_walk_same_name_collision_last_visited_wins() {
        let src = TempDir::new().unwrap();
        let backup = TempDir::new().unwrap();
        std::fs::create_dir_all(src.path().join("dir1")).unwrap();
        std::fs::create_dir_all(src.path().join("dir2")).unwrap();
        std::fs::write(src.path().join("dir1/note.txt"), "from dir1").unwrap();
        std::fs::write(src.path().join("dir2/note.txt"), "from dir2").unwrap();

        let copied = walk_and_copy(src.path(), backup.path(), &FileFilter::All, FailurePolicy::Stop)
            .into_result()
            .unwrap();

        assert_eq!(copied, 2);
        assert_eq!(backup_names(backup.path()), vec!["note.txt"]);
        assert_eq!(
            std::fs::read_to_string(backup.path().join("note.txt")).unwrap(),
            "from dir2"
        );
    }

    #[test]
    fn test_walk_skips_nested_backup_dir() {
        let src = TempDir::new().unwrap();
        std::fs::write(src.path().join("a.txt"), "hello").unwrap();
        let backup = src.path().join("zz_backup");
        std::fs::create_dir(&backup).unwrap();
        std::fs::write(backup.join("old.txt"), "old").unwrap();

        let copied = walk_and_copy(src.path(), &backup, &FileFilter::All, FailurePolicy::Stop)
            .into_result()
            .unwrap();

        assert_eq!(copied, 1);
        assert_eq!(std::fs::read_to_string(backup.join("old.txt")).unwrap(), "old");
    }

    #[cfg(unix)]
    fn create_locked_tree(dir: &Path) {
        use std::os::unix::fs::PermissionsExt;

        std::fs::write(dir.join("a.txt"), "a").unwrap();
        std::fs::write(dir.join("b_locked.txt"), "b").unwrap();
        std::fs::write(dir.join("c.txt"), "c").unwrap();
        std::fs::set_permissions(
            dir.join("b_locked.txt"),
            std::fs::Permissions::from_mode(0o200),
        )
        .unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_stops_at_first_failure() {
        let src = TempDir::new().unwrap();
        let backup = TempDir::new().unwrap();
        create_locked_tree(src.path());

        let tally = walk_and_copy(src.path(), backup.path(), &FileFilter::All, FailurePolicy::Stop);

        assert_eq!(tally.copied, 1);
        let err = tally.error.expect("walk should fail");
        assert!(matches!(err.root(), Error::PermissionDenied { .. }));
        assert_eq!(backup_names(backup.path()), vec!["a.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_keep_going_collects_failures() {
        let src = TempDir::new().unwrap();
        let backup = TempDir::new().unwrap();
        create_locked_tree(src.path());

        let tally = walk_and_copy(
            src.path(),
            backup.path(),
            &FileFilter::All,
            FailurePolicy::KeepGoing,
        );

        assert_eq!(tally.copied, 2);
        match tally.error {
            Some(Error::LotsOfError(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(matches!(errors[0].root(), Error::PermissionDenied { .. }));
            }
            other => panic!("Expected LotsOfError, got {other:?}"),
        }
        assert_eq!(backup_names(backup.path()), vec!["a.txt", "c.txt"]);
    }

    #[test]
    fn test_failure_policy_from_bool() {
        assert_eq!(FailurePolicy::from(false), FailurePolicy::Stop);
        assert_eq!(FailurePolicy::from(true), FailurePolicy::KeepGoing);
    }
}
