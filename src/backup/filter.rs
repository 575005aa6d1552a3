use derive_more::Display;
use std::ffi::OsStr;
use std::sync::Arc;

/// Selects which files a backup run copies
///
/// At most one selector is ever active. Matching only looks at the base name
/// of a file, never at the directories above it.
#[derive(Clone, Debug, Default, Display, PartialEq, Eq)]
pub enum FileFilter {
    /// Every regular file is selected
    #[default]
    #[display("<all files>")]
    All,
    /// Base name must equal the value exactly
    #[display("{_0}")]
    Name(Arc<str>),
    /// Base name must end with the literal value, e.g. `.txt`
    #[display("{_0}")]
    Suffix(Arc<str>),
}

impl FileFilter {
    /// Builds the filter from the optional name and suffix settings.
    ///
    /// Empty strings count as unset. Returns `None` when both are set, callers
    /// are expected to have rejected that configuration already.
    pub fn from_options(file: Option<&str>, file_type: Option<&str>) -> Option<Self> {
        let file = file.filter(|s| !s.is_empty());
        let file_type = file_type.filter(|s| !s.is_empty());
        match (file, file_type) {
            (None, None) => Some(Self::All),
            (Some(name), None) => Some(Self::Name(name.into())),
            (None, Some(suffix)) => Some(Self::Suffix(suffix.into())),
            (Some(_), Some(_)) => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::All)
    }

    pub fn matches(&self, file_name: &OsStr) -> bool {
        match self {
            Self::All => true,
            Self::Name(name) => file_name == OsStr::new(name.as_ref()),
            Self::Suffix(suffix) => file_name
                .as_encoded_bytes()
                .ends_with(suffix.as_bytes()),
        }
    }
}
