use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::error::{IncludeVarsError, Result};
use crate::loader::VarsLoader;
use crate::models::{DirectoryEntry, Settings};
use crate::resolver::ROLE_DEFAULT_VARS_FILE;

/// Folds every directory's fragment into one mapping, in walk order.
///
/// Stops at the first failing directory. `no_log` is switched on as soon as the
/// loader reports a file as unsafe to echo, and is never switched back off.
pub fn merge<I, L>(entries: I, settings: &Settings, loader: &L, no_log: &mut bool) -> Result<Mapping>
where
    I: IntoIterator<Item = DirectoryEntry>,
    L: VarsLoader + ?Sized,
{
    let mut results = Mapping::new();
    for entry in entries {
        let fragment = load_fragment(&entry, settings, loader, no_log)?;
        for (key, value) in fragment {
            results.insert(key, value);
        }
    }
    Ok(results)
}

/// Loads the candidate files of one directory, later files overwriting
/// earlier keys. Keys are replaced whole, never merged recursively.
pub fn load_fragment<L>(
    entry: &DirectoryEntry,
    settings: &Settings,
    loader: &L,
    no_log: &mut bool,
) -> Result<Mapping>
where
    L: VarsLoader + ?Sized,
{
    let mut fragment = Mapping::new();

    for filename in &entry.filenames {
        if !is_candidate(filename, settings)? {
            log::trace!("Skipping {}", filename);
            continue;
        }

        let path = entry.path.join(filename);
        // Listed earlier, may be gone by now.
        if !path.exists() {
            log::debug!("{} no longer exists, skipping", path.display());
            continue;
        }

        for (key, value) in load_file(&path, loader, no_log)? {
            fragment.insert(key, value);
        }
    }

    Ok(fragment)
}

fn is_candidate(filename: &str, settings: &Settings) -> Result<bool> {
    if settings.in_role && filename == ROLE_DEFAULT_VARS_FILE {
        return Ok(false);
    }

    if let Some(pattern) = &settings.files_matching {
        if !pattern.is_match(filename)? {
            return Ok(false);
        }
    }

    for pattern in &settings.ignore_files {
        if pattern.is_match(filename)? {
            return Ok(false);
        }
    }

    Ok(true)
}

fn load_file<L>(path: &Path, loader: &L, no_log: &mut bool) -> Result<Mapping>
where
    L: VarsLoader + ?Sized,
{
    let load_failed = |source| IncludeVarsError::LoadFailed {
        path: path.to_path_buf(),
        source,
    };

    let (data, show_content) = loader.get_file_contents(path).map_err(load_failed)?;
    if !show_content {
        *no_log = true;
    }

    match loader.load(&data, show_content).map_err(load_failed)? {
        None => Ok(Mapping::new()),
        Some(Value::Mapping(vars)) => {
            log::debug!("Loaded {} vars from {}", vars.len(), path.display());
            if show_content {
                let keys: Vec<_> = vars.keys().collect();
                log::trace!("{}: {:?}", path.display(), keys);
            }
            Ok(vars)
        }
        Some(_) => Err(IncludeVarsError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}
