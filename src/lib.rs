//! Recursively load variable files from a directory tree and merge them into a
//! single mapping.
//!
//! The crate is an embeddable task: a host hands it a [`Task`] (raw arguments
//! plus an optional role context) and a [`VarsLoader`], and gets back one
//! [`TaskResult`].
//!
//! ```rust,no_run
//! use include_vars_dir::{run, Task, YamlLoader};
//!
//! let mut args = serde_yaml::Mapping::new();
//! args.insert("dir".into(), "group_vars".into());
//!
//! let result = run(&Task::new(args), &YamlLoader).unwrap();
//! println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! ```

pub mod error;
pub mod loader;
pub mod merger;
pub mod models;
pub mod pattern;
pub mod resolver;
pub mod scanner;
pub mod task;

pub use error::{IncludeVarsError, Result};
pub use loader::{LoaderError, VarsLoader, YamlLoader};
pub use merger::{load_fragment, merge};
pub use models::{DirectoryEntry, RoleContext, Settings, Task, TaskResult};
pub use pattern::Pattern;
pub use resolver::{resolve_settings, DEFAULT_IGNORE_FILES, ROLE_DEFAULT_VARS_FILE, VALID_ARGUMENTS};
pub use scanner::{Scanner, Walk};
pub use task::run;
