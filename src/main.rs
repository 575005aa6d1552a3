use clap::Parser;
use flat_backup::backup::backup_config::RunConfig;
use flat_backup::backup::result_error::error::Error;
use flat_backup::backup::result_error::result::Result;
use flat_backup::backup::result_error::AddMsg;
use flat_backup::backup::scheduler::{Scheduler, SystemClock};
use std::fs::File;
use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;
use tracing::error;
use validator::Validate;

/// Copy files from a directory tree into a flat backup directory, again and again
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YAML config file, used instead of the other flags
    #[arg(
        short,
        long,
        conflicts_with_all = ["source", "backup", "file", "file_type", "interval", "keep_going"]
    )]
    config: Option<PathBuf>,

    /// Path to the source directory
    #[arg(long, required_unless_present = "config")]
    source: Option<PathBuf>,

    /// Path to the backup directory, created if missing
    #[arg(long, required_unless_present = "config")]
    backup: Option<PathBuf>,

    /// Specific file to backup
    #[arg(long)]
    file: Option<String>,

    /// Specific file type to backup (e.g. .txt, .pdf)
    #[arg(long = "type")]
    file_type: Option<String>,

    /// Seconds between backups
    #[arg(long, default_value_t = 0)]
    interval: u64,

    /// Keep copying other files after one fails
    #[arg(long)]
    keep_going: bool,
}

impl Args {
    fn into_run_config(self) -> Result<RunConfig> {
        match self.config {
            Some(path) => File::open(&path)
                .map_err(Error::from)
                .and_then(|f| serde_yml::from_reader::<_, RunConfig>(f).map_err(Error::from))
                .add_msg(format!("Parse YAML config failed: {:?}", &path)),
            None => Ok(RunConfig::builder()
                .source_dir(self.source.unwrap_or_default())
                .backup_dir(self.backup.unwrap_or_default())
                .maybe_file(self.file)
                .maybe_file_type(self.file_type)
                .interval(Duration::from_secs(self.interval))
                .keep_going(self.keep_going)
                .build()),
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let res = args.into_run_config().and_then(|rc| {
        rc.validate()
            .map_err(Error::from)
            .map(|_| rc)
            .add_msg("Config validation failed")
    });

    match res {
        Ok(rc) => Scheduler::new(rc, SystemClock).start_loop(),
        Err(e) => {
            error!("{e}");
            exit(1);
        }
    }
}
