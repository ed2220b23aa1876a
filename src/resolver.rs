use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

use crate::error::{IncludeVarsError, Result};
use crate::models::{render_value, Settings, Task};
use crate::pattern::Pattern;

pub const VALID_ARGUMENTS: [&str; 5] = ["name", "dir", "depth", "files_matching", "ignore_files"];

/// Always ignored, after whatever the task asks for. Can be extended, never replaced.
pub const DEFAULT_IGNORE_FILES: [&str; 3] = [".*.md", ".*.py", ".*.pyc"];

/// Loaded by the host as role defaults, so never loaded here inside a role.
pub const ROLE_DEFAULT_VARS_FILE: &str = "main.yml";

/// Validates the task arguments and resolves them into [`Settings`].
///
/// Touches no filesystem state: a missing source directory is reported later,
/// by the caller.
pub fn resolve_settings(task: &Task) -> Result<Settings> {
    let args = &task.args;

    for key in args.keys() {
        let known = key
            .as_str()
            .is_some_and(|k| VALID_ARGUMENTS.contains(&k));
        if !known {
            return Err(IncludeVarsError::InvalidArgument(format!(
                "{} is not a valid option in include_vars_dir",
                render_value(key)
            )));
        }
    }

    let dir = string_arg(args, "dir")?
        .filter(|dir| !dir.is_empty())
        .ok_or_else(|| IncludeVarsError::MissingDirectory {
            task: task.describe(),
        })?;

    let source_dir = match &task.role {
        Some(role) if dir == "vars" => role.role_path.join(&dir),
        Some(role) => role.vars_dir().join(&dir),
        None => PathBuf::from(&dir),
    };

    let settings = Settings {
        source_dir,
        depth: depth_arg(args.get("depth"))?,
        name: string_arg(args, "name")?.filter(|n| !n.is_empty()),
        files_matching: string_arg(args, "files_matching")?
            .filter(|p| !p.is_empty())
            .map(Pattern::search),
        ignore_files: ignore_patterns(args.get("ignore_files"))?,
        in_role: task.role.is_some(),
    };

    log::debug!("Resolved settings: {:?}", settings);
    Ok(settings)
}

fn string_arg(args: &Mapping, key: &str) -> Result<Option<String>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(IncludeVarsError::InvalidArgument(format!(
            "{} must be a string, got {}",
            key,
            render_value(other)
        ))),
    }
}

fn depth_arg(value: Option<&Value>) -> Result<usize> {
    let depth = match value {
        None | Some(Value::Null) => Some(0),
        Some(Value::Number(n)) => n.as_u64().and_then(|d| usize::try_from(d).ok()),
        // Free-form `depth=2` arrives as a string.
        Some(Value::String(s)) => s.trim().parse::<usize>().ok(),
        Some(_) => None,
    };

    depth.ok_or_else(|| {
        IncludeVarsError::InvalidArgument(format!(
            "depth must be a non-negative integer, got {}",
            value.map(render_value).unwrap_or_default()
        ))
    })
}

/// User patterns in the order given, then the defaults.
fn ignore_patterns(value: Option<&Value>) -> Result<Vec<Pattern>> {
    let user: Vec<String> = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => s.split_whitespace().map(str::to_owned).collect(),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_owned).ok_or_else(|| {
                    IncludeVarsError::InvalidArgument(format!(
                        "ignore_files entries must be strings, got {}",
                        render_value(item)
                    ))
                })
            })
            .collect::<Result<_>>()?,
        Some(other) => {
            return Err(IncludeVarsError::InvalidArgument(format!(
                "{} must be a list",
                render_value(other)
            )))
        }
    };

    Ok(user
        .into_iter()
        .chain(DEFAULT_IGNORE_FILES.iter().map(|p| p.to_string()))
        .map(Pattern::suffix)
        .collect())
}
