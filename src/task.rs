use serde_yaml::{Mapping, Value};

use crate::error::{IncludeVarsError, Result};
use crate::loader::VarsLoader;
use crate::merger::merge;
use crate::models::{Task, TaskResult};
use crate::resolver::resolve_settings;
use crate::scanner::Scanner;

/// Runs one invocation end to end.
///
/// Argument problems are returned as `Err` before the filesystem is touched.
/// Everything after that, including a missing source directory, comes back as
/// a failed [`TaskResult`].
pub fn run<L>(task: &Task, loader: &L) -> Result<TaskResult>
where
    L: VarsLoader + ?Sized,
{
    let settings = resolve_settings(task)?;

    if !settings.source_dir.exists() {
        let err = IncludeVarsError::DirectoryNotFound {
            path: settings.source_dir.clone(),
        };
        log::warn!("{}", err);
        return Ok(TaskResult::failure(err.to_string(), false));
    }

    let walk = Scanner::new(&settings).scan();
    let mut no_log = false;

    let result = match merge(walk, &settings, loader, &mut no_log) {
        Ok(vars) => {
            log::info!(
                "Included {} vars from {}",
                vars.len(),
                settings.source_dir.display()
            );
            let facts = match &settings.name {
                Some(name) => {
                    let mut scope = Mapping::new();
                    scope.insert(Value::String(name.clone()), Value::Mapping(vars));
                    scope
                }
                None => vars,
            };
            TaskResult::facts(facts, no_log)
        }
        Err(err) => {
            log::warn!("{}", err);
            TaskResult::failure(err.to_string(), no_log)
        }
    };

    Ok(result)
}
