use std::path::PathBuf;
use thiserror::Error;

use crate::loader::LoaderError;

#[derive(Debug, Error)]
pub enum IncludeVarsError {
    #[error(
        "No directory was found for the included vars. Use `- include_vars_dir: <dirname>` or the `dir:` option to specify the vars dirname.{task}"
    )]
    MissingDirectory { task: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Invalid regular expression: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{} must be stored as a dictionary/hash", .path.display())]
    NotAMapping { path: PathBuf },

    #[error("{} directory does not exist", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to load {}: {source}", .path.display())]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: LoaderError,
    },
}

pub type Result<T> = std::result::Result<T, IncludeVarsError>;
