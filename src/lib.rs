//! # flat-backup
//!
//! Periodically copies files from a source directory tree into one flat
//! backup directory.
//!
//! ## Features
//!
//! - **Interval Scheduling**: Runs forever with a fixed pause between backups
//! - **Filters**: Back up one exact file name or every file with a suffix
//! - **Flat Output**: Files land in the backup directory under their base name
//! - **Failure Policy**: Stop at the first failed copy or keep going
//!
//! ## Quick Start
//!
//! ```no_run
//! use flat_backup::backup::backup_config::RunConfig;
//! use flat_backup::backup::scheduler::{Scheduler, SystemClock};
//!
//! let config = RunConfig::builder()
//!     .source_dir("/home/me/documents")
//!     .backup_dir("/mnt/backup")
//!     .file_type(".txt")
//!     .interval(std::time::Duration::from_secs(3600))
//!     .build();
//!
//! // Never returns
//! Scheduler::new(config, SystemClock).start_loop();
//! ```

pub mod backup;
