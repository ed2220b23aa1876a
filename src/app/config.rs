use crate::app::cli::Cli;
use anyhow::{Context, Result};
use include_vars_dir::{RoleContext, Task};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PresetConfig {
    dir: Option<String>,
    name: Option<String>,
    depth: Option<u64>,
    files_matching: Option<String>,
    ignore_files: Option<Vec<String>>,
}

fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("include_vars_dir")
        .join("presets.toml"))
}

fn load_presets_from(config_path: &Path) -> Result<HashMap<String, PresetConfig>> {
    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    let parsed: PresetsFile = toml::from_str(&content)
        .context(format!("Failed to parse presets at {:?}", config_path))?;

    Ok(parsed.presets)
}

fn load_args_file(path: &Path) -> Result<Mapping> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read task arguments at {:?}", path))?;

    let args: Option<Mapping> = serde_yaml::from_str(&content)
        .context(format!("Task arguments in {:?} must be a mapping", path))?;

    Ok(args.unwrap_or_default())
}

/// Whitespace-split string or list of strings; anything else is left for the
/// resolver to reject.
fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(s.split_whitespace().map(str::to_owned).collect()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => None,
    }
}

/// Later layers replace earlier values, except `ignore_files` lists, which
/// are appended.
fn overlay(args: &mut Mapping, key: &str, value: Value) {
    if key == "ignore_files" {
        let existing = match args.get(key) {
            None | Some(Value::Null) => Some(Vec::new()),
            Some(existing) => string_list(existing),
        };

        match (existing, string_list(&value)) {
            (Some(mut combined), Some(extra)) => {
                combined.extend(extra);
                // Deduplicate while keeping order
                let mut seen = std::collections::HashSet::new();
                combined.retain(|item| seen.insert(item.clone()));

                let list = combined.into_iter().map(Value::String).collect();
                args.insert(key.into(), Value::Sequence(list));
                return;
            }
            // An earlier malformed value is kept so the resolver rejects it.
            (None, _) => {
                log::debug!("Not appending to malformed ignore_files");
                return;
            }
            (Some(_), None) => {}
        }
    }
    args.insert(key.into(), value);
}

fn overlay_fields(
    args: &mut Mapping,
    dir: Option<String>,
    name: Option<String>,
    depth: Option<u64>,
    files_matching: Option<String>,
    ignore_files: Option<Vec<String>>,
) {
    let fields = [
        ("dir", dir.map(Value::String)),
        ("name", name.map(Value::String)),
        ("depth", depth.map(Value::from)),
        ("files_matching", files_matching.map(Value::String)),
        (
            "ignore_files",
            ignore_files.map(|list| Value::Sequence(list.into_iter().map(Value::String).collect())),
        ),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            overlay(args, key, value);
        }
    }
}

/// Builds the task from a preset, then the args file, then CLI flags.
pub fn build_task(cli: Cli, presets: &HashMap<String, PresetConfig>) -> Result<Task> {
    let preset = match cli.preset.as_deref() {
        Some(key) => presets.get(key).cloned().unwrap_or_else(|| {
            log::warn!("No preset named {:?} in presets.toml", key);
            PresetConfig::default()
        }),
        None => PresetConfig::default(),
    };

    let mut args = Mapping::new();
    overlay_fields(
        &mut args,
        preset.dir,
        preset.name,
        preset.depth,
        preset.files_matching,
        preset.ignore_files,
    );

    if let Some(path) = &cli.args_file {
        for (key, value) in load_args_file(path)? {
            if let Some(key) = key.as_str().map(str::to_owned) {
                overlay(&mut args, &key, value);
            } else {
                args.insert(key, value);
            }
        }
    }

    overlay_fields(
        &mut args,
        cli.dir,
        cli.name,
        cli.depth,
        cli.files_matching,
        cli.ignore_files,
    );

    let task = Task::new(args);
    Ok(match cli.role_path {
        Some(role_path) => task.with_role(RoleContext::new(role_path)),
        None => task,
    })
}

pub fn resolve_task(cli: Cli) -> Result<Task> {
    let presets = load_presets_from(&presets_path()?)?;
    build_task(cli, &presets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use include_vars_dir::IncludeVarsError;
    use tempfile::{NamedTempFile, TempDir};

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("include-vars-dir").chain(args.iter().copied()))
    }

    fn ignore_files(task: &Task) -> Vec<&str> {
        task.args["ignore_files"]
            .as_sequence()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn cli_flags_become_task_args() {
        let task = build_task(
            cli(&["--dir", "vars", "--depth", "2", "--ignore-files", "a.yml", "b.yml"]),
            &HashMap::new(),
        )
        .unwrap();

        assert_eq!(task.args["dir"], Value::from("vars"));
        assert_eq!(task.args["depth"], Value::from(2u64));
        assert_eq!(ignore_files(&task), vec!["a.yml", "b.yml"]);
        assert!(task.args.get("name").is_none());
        assert!(task.role.is_none());
    }

    #[test]
    fn preset_is_overridden_and_ignore_lists_appended() {
        let presets: PresetsFile = toml::from_str(
            r#"
            [web]
            dir = "group_vars"
            name = "web"
            ignore_files = ["local.yml", "a.yml"]
            "#,
        )
        .unwrap();

        let task = build_task(
            cli(&["--preset", "web", "--name", "override", "--ignore-files", "a.yml", "b.yml"]),
            &presets.presets,
        )
        .unwrap();

        assert_eq!(task.args["dir"], Value::from("group_vars"));
        assert_eq!(task.args["name"], Value::from("override"));
        assert_eq!(ignore_files(&task), vec!["local.yml", "a.yml", "b.yml"]);
    }

    #[test]
    fn args_file_sits_between_preset_and_flags() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"dir: from_file\nfiles_matching: web\nignore_files: x.yml y.yml\n",
        )
        .unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let task = build_task(
            cli(&["--args-file", &path, "--dir", "from_flag", "--ignore-files", "z.yml"]),
            &HashMap::new(),
        )
        .unwrap();

        assert_eq!(task.args["dir"], Value::from("from_flag"));
        assert_eq!(task.args["files_matching"], Value::from("web"));
        assert_eq!(ignore_files(&task), vec!["x.yml", "y.yml", "z.yml"]);
    }

    #[test]
    fn args_file_keeps_unknown_keys_for_the_resolver() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"dir: vars\nfile: stuff.yml\n").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let task = build_task(cli(&["--args-file", &path]), &HashMap::new()).unwrap();
        assert!(include_vars_dir::resolve_settings(&task).is_err());
    }

    #[test]
    fn role_path_sets_role_context() {
        let task = build_task(cli(&["--dir", "vars", "--role-path", "/roles/web"]), &HashMap::new()).unwrap();
        assert_eq!(task.role.unwrap().role_path, PathBuf::from("/roles/web"));
    }

    fn args_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn malformed_ignore_files_survives_cli_flags() {
        for content in ["dir: vars\nignore_files: {a: b}\n", "dir: vars\nignore_files: [a.yml, 3]\n"] {
            let file = args_file(content);
            let path = file.path().to_string_lossy().into_owned();

            let task = build_task(
                cli(&["--args-file", &path, "--ignore-files", "z.yml"]),
                &HashMap::new(),
            )
            .unwrap();

            assert!(matches!(
                include_vars_dir::resolve_settings(&task),
                Err(IncludeVarsError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn malformed_cli_layer_replaces_valid_list() {
        let mut args = Mapping::new();
        overlay(&mut args, "ignore_files", Value::from("a.yml"));
        overlay(&mut args, "ignore_files", Value::from(7));
        assert_eq!(args["ignore_files"], Value::from(7));
    }

    #[test]
    fn presets_live_under_home_config() {
        let path = presets_path().unwrap();
        assert!(path.starts_with(dirs::home_dir().unwrap()));
        assert!(path.ends_with(".config/include_vars_dir/presets.toml"));
    }

    #[test]
    fn presets_load_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presets.toml");

        assert!(load_presets_from(&path).unwrap().is_empty());

        fs::write(&path, "[web]\ndir = \"group_vars\"\ndepth = 2\n\n[db]\nname = \"db\"\n").unwrap();
        let presets = load_presets_from(&path).unwrap();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets["web"].dir.as_deref(), Some("group_vars"));
        assert_eq!(presets["web"].depth, Some(2));
        assert_eq!(presets["db"].name.as_deref(), Some("db"));

        fs::write(&path, "[web\n").unwrap();
        assert!(load_presets_from(&path).is_err());
    }
}
