use crate::backup::result_error::{AddFunctionName, AddMsg};
use itertools::Itertools;
use std::fmt::Debug;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    InvalidConfig(#[from] validator::ValidationErrors),
    #[error(transparent)]
    InvalidField(#[from] validator::ValidationError),
    #[error(transparent)]
    SerdeYml(#[from] serde_yml::Error),
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
    #[error("{path:?} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("failed to create backup directory {path:?}: {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("source file {path:?} does not have read permissions")]
    PermissionDenied { path: PathBuf },
    #[error("failed to open source file {src:?} (destination {dst:?}): {source}")]
    OpenFailed {
        src: PathBuf,
        dst: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create destination file {dst:?} (source {src:?}): {source}")]
    CreateFailed {
        src: PathBuf,
        dst: PathBuf,
        source: std::io::Error,
    },
    #[error("error while copying file {src:?} to {dst:?}: {source}")]
    CopyFailed {
        src: PathBuf,
        dst: PathBuf,
        source: std::io::Error,
    },
    #[error("source and backup directory are the same: {path:?}")]
    SameDirectory { path: PathBuf },
    #[error("no file matching the filter {filter} found in {src_dir:?}")]
    NoMatchingFile { filter: String, src_dir: PathBuf },
    #[error("{}:\n{}", msg, indent::indent_all_with("  ", error.to_string()))]
    WithMsg { msg: String, error: Box<Error> },
    #[error("{} failed:\n{}", fn_name, indent::indent_all_with("  ", error.to_string()))]
    WithFnName { fn_name: String, error: Box<Error> },
    #[error("{}", itertools::join(.0, "\n\n"))]
    LotsOfError(Vec<Error>),
}

impl<S: Into<String>> AddMsg<S> for Error {
    fn add_msg(self, msg: S) -> Self {
        Self::WithMsg {
            msg: msg.into(),
            error: Box::new(self),
        }
    }
}

impl<S: Into<String>> AddFunctionName<S> for Error {
    fn add_fn_name(self, fn_name: S) -> Self {
        Self::WithFnName {
            fn_name: fn_name.into(),
            error: Box::new(self),
        }
    }
}

impl From<Vec<Error>> for Error {
    fn from(errors: Vec<Error>) -> Self {
        if errors.is_empty() {
            panic!("Should not create lots of errors when error is empty")
        }
        Self::LotsOfError(errors.into_iter().flat_map(|e| e.into_iter()).collect_vec())
    }
}

impl Error {
    pub fn into_iter(self) -> Box<dyn Iterator<Item = Error>> {
        match self {
            Error::LotsOfError(v) => Box::new(v.into_iter().flat_map(|e| e.into_iter())),
            e => Box::new(std::iter::once(e)),
        }
    }

    /// Strips `WithMsg`/`WithFnName` wrappers and returns the error they carry.
    pub fn root(&self) -> &Error {
        match self {
            Error::WithMsg { error, .. } | Error::WithFnName { error, .. } => error.root(),
            e => e,
        }
    }
}
