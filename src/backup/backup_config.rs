use crate::backup::filter::FileFilter;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::AddMsg;
use crate::backup::validate::{
    validate_dir_exist, validate_dir_exist_or_created, validate_distinct_dirs,
};
use crate::backup::walk::walk_and_copy;

use bon::Builder;
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use validator::{Validate, ValidationError};

/// Everything one backup run needs, fixed for the lifetime of the process
///
/// Validation only looks at the values themselves and never at the
/// filesystem, directories are checked at the start of each run.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, Builder, Getters, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = validate_single_filter))]
#[getset(get = "pub")]
pub struct RunConfig {
    #[builder(into)]
    source_dir: PathBuf,
    #[builder(into)]
    backup_dir: PathBuf,
    /// Exact base name to back up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    file: Option<String>,
    /// Base name suffix to back up, e.g. `.txt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    file_type: Option<String>,
    #[serde(default, with = "humantime_serde")]
    #[builder(default)]
    interval: Duration,
    /// Keep walking after a file fails to copy
    #[serde(default)]
    #[builder(default)]
    keep_going: bool,
}

fn validate_single_filter(config: &RunConfig) -> std::result::Result<(), ValidationError> {
    config.file_filter().map(|_| ())
}

impl RunConfig {
    fn file_filter(&self) -> std::result::Result<FileFilter, ValidationError> {
        FileFilter::from_options(self.file.as_deref(), self.file_type.as_deref()).ok_or_else(|| {
            ValidationError::new("ConflictingFilters").with_message(
                "Cannot specify both file and type filters together, specify either".into(),
            )
        })
    }

    pub fn filter(&self) -> Result<FileFilter> {
        self.file_filter().map_err(Error::from)
    }

    /// Runs one backup: check the source, make sure the backup directory
    /// exists and is not the source itself, then walk and copy.
    ///
    /// Returns the number of copied files. A run with an active filter that
    /// copies nothing fails with [`Error::NoMatchingFile`].
    pub fn run_backup(&self) -> Result<usize> {
        let filter = self.filter()?;
        validate_dir_exist(&self.source_dir)?;
        validate_dir_exist_or_created(&self.backup_dir)?;
        validate_distinct_dirs(&self.source_dir, &self.backup_dir)?;

        let tally = walk_and_copy(
            &self.source_dir,
            &self.backup_dir,
            &filter,
            self.keep_going.into(),
        );
        tracing::info!("{} file(s) backed up.", tally.copied);

        let copied = tally
            .into_result()
            .add_msg("Backup process encountered an error")?;
        if copied == 0 && filter.is_active() {
            return Err(Error::NoMatchingFile {
                filter: filter.to_string(),
                src_dir: self.source_dir.clone(),
            });
        }

        Ok(copied)
    }
}
