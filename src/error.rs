use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Invalid format of root `folio.toml`: {0}")]
    InvalidRootTomlFile(#[from] toml::de::Error),
    #[error("Invalid site url `{0}`, it must be an absolute http(s) url")]
    InvalidSiteUrl(String),
    #[error("No `folio.toml` found in `{}` or any parent directory", .0.display())]
    RootNotFound(PathBuf),
}

/// The reason a single content record was left out of the feed.
///
/// These errors never abort a build: the record is skipped and
/// reported, the remaining records are still emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("`{origin}` is missing required field `{field}`")]
    MissingField { origin: String, field: &'static str },
    #[error("`{origin}` has an invalid date `{value}`")]
    InvalidDate { origin: String, value: String },
    #[error("`{origin}` could not be loaded: {reason}")]
    Unreadable { origin: String, reason: String },
}

impl RecordError {
    /// Where the broken record came from, usually a file path.
    pub fn origin(&self) -> &str {
        match self {
            Self::MissingField { origin, .. }
            | Self::InvalidDate { origin, .. }
            | Self::Unreadable { origin, .. } => origin,
        }
    }
}
