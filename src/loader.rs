use serde_yaml::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

/// Reads and parses variable files on behalf of the merger.
///
/// Hosts plug in their own loader (decryption, templating, caching); the
/// crate only relies on these two calls.
pub trait VarsLoader {
    /// Raw file content, and whether that content may be echoed in logs.
    fn get_file_contents(&self, path: &Path) -> Result<(String, bool), LoaderError>;

    /// Parses raw content. `None` means the file held nothing.
    fn load(&self, data: &str, show_content: bool) -> Result<Option<Value>, LoaderError>;
}

/// Plain YAML (and therefore JSON) files from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlLoader;

impl VarsLoader for YamlLoader {
    fn get_file_contents(&self, path: &Path) -> Result<(String, bool), LoaderError> {
        let data = fs::read_to_string(path)?;
        Ok((data, true))
    }

    fn load(&self, data: &str, _show_content: bool) -> Result<Option<Value>, LoaderError> {
        match serde_yaml::from_str::<Value>(data)? {
            Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }
}
