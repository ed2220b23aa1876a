use ignore::{DirEntry, WalkBuilder};
use std::collections::HashMap;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use crate::models::{DirectoryEntry, Settings};

pub struct Scanner {
    root: PathBuf,
    depth: usize,
}

impl Scanner {
    pub fn new(settings: &Settings) -> Self {
        Self {
            root: settings.source_dir.clone(),
            depth: settings.depth,
        }
    }

    /// Lists the whole tree up front, sorts it, and hands back a lazy walk over
    /// the sorted directories.
    pub fn scan(&self) -> Walk {
        let mut listing: HashMap<PathBuf, Vec<String>> = HashMap::new();

        // Nothing is filtered here: hidden files and ignore files are listed too.
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .build();

        for result in walker {
            match result {
                Ok(entry) => record_entry(&mut listing, &entry),
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        let mut entries: Vec<DirectoryEntry> = listing
            .into_iter()
            .map(|(path, mut filenames)| {
                filenames.sort();
                DirectoryEntry { path, filenames }
            })
            .collect();

        // Plain byte order on the whole path, not component order.
        entries.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));

        log::debug!(
            "Found {} directories under {}",
            entries.len(),
            self.root.display()
        );
        Walk::new(entries, self.depth)
    }
}

fn record_entry(listing: &mut HashMap<PathBuf, Vec<String>>, entry: &DirEntry) {
    let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
    if is_dir {
        listing.entry(normalize(entry.path())).or_default();
        return;
    }

    // The source itself is a file: no directories to yield.
    if entry.depth() == 0 {
        return;
    }

    // Symlinked directories are not descended, and they are not files either.
    if entry.path_is_symlink() && entry.path().is_dir() {
        return;
    }

    if let Some(parent) = entry.path().parent() {
        listing
            .entry(normalize(parent))
            .or_default()
            .push(entry.file_name().to_string_lossy().into_owned());
    }
}

/// Drops trailing separators and interior `.` so a directory and its files'
/// parents share a key.
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

/// Sorted directories, cut off once the depth limit is exceeded.
///
/// Depth counts directories in traversal order, not nesting: with a limit of
/// 2 the walk yields the first two sorted directories, whatever their level.
pub struct Walk {
    entries: std::vec::IntoIter<DirectoryEntry>,
    depth_limit: usize,
    visited: usize,
    done: bool,
}

impl Walk {
    fn new(entries: Vec<DirectoryEntry>, depth_limit: usize) -> Self {
        Self {
            entries: entries.into_iter(),
            depth_limit,
            visited: 0,
            done: false,
        }
    }
}

impl Iterator for Walk {
    type Item = DirectoryEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(entry) = self.entries.next() else {
            self.done = true;
            return None;
        };

        self.visited += 1;
        if self.depth_limit != 0 && self.visited > self.depth_limit {
            log::debug!("Depth limit {} reached", self.depth_limit);
            self.done = true;
            return None;
        }

        Some(entry)
    }
}

impl FusedIterator for Walk {}
