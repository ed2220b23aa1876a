use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

use crate::pattern::Pattern;

/// The role a task is executing in, if any.
#[derive(Debug, Clone)]
pub struct RoleContext {
    pub role_path: PathBuf,
}

impl RoleContext {
    pub fn new(role_path: impl Into<PathBuf>) -> Self {
        Self {
            role_path: role_path.into(),
        }
    }

    /// The role's conventional variable directory.
    pub fn vars_dir(&self) -> PathBuf {
        self.role_path.join("vars")
    }
}

/// One invocation as handed over by the host.
#[derive(Debug, Clone, Default)]
pub struct Task {
    pub args: Mapping,
    pub role: Option<RoleContext>,
    /// The task as written in the playbook, echoed back in diagnostics.
    pub definition: Option<Value>,
}

impl Task {
    pub fn new(args: Mapping) -> Self {
        Self {
            args,
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: RoleContext) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_definition(mut self, definition: Value) -> Self {
        self.definition = Some(definition);
        self
    }

    /// Renders the raw task definition, falling back to the arguments.
    pub fn describe(&self) -> String {
        match &self.definition {
            Some(definition) => render_value(definition),
            None => render_value(&Value::Mapping(self.args.clone())),
        }
    }
}

/// Resolved invocation settings. Immutable once built by the resolver.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source_dir: PathBuf,
    /// Number of directories to visit in sorted order; 0 means unlimited.
    pub depth: usize,
    /// Nest the merged result under this key.
    pub name: Option<String>,
    pub files_matching: Option<Pattern>,
    /// User patterns first, then the default ignore set.
    pub ignore_files: Vec<Pattern>,
    pub in_role: bool,
}

/// A directory and the bare names of the files it directly contains, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub filenames: Vec<String>,
}

/// What the host receives back. Either facts or a failure message, never both.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansible_facts: Option<Mapping>,
    #[serde(rename = "_ansible_no_log")]
    pub no_log: bool,
}

impl TaskResult {
    pub fn facts(facts: Mapping, no_log: bool) -> Self {
        Self {
            failed: false,
            message: None,
            ansible_facts: Some(facts),
            no_log,
        }
    }

    pub fn failure(message: impl Into<String>, no_log: bool) -> Self {
        Self {
            failed: true,
            message: Some(message.into()),
            ansible_facts: None,
            no_log,
        }
    }
}

/// Single-line rendering of an arbitrary value for error messages.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // Non-string keys can't go through JSON.
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{:?}", other)),
    }
}
