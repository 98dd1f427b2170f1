//! Recursive enumeration of candidate files under a scan root.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use super::filter::FilterConfig;

/// Version-control metadata directories that are never descended into.
const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// An eligible file found by the [`Walker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path on disk
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated
    pub relative: String,
    /// Extension without the dot, if any
    pub extension: Option<String>,
}

impl Candidate {
    /// Final path component, used for language lookup.
    pub fn file_name(&self) -> &str {
        self.relative
            .rsplit_once('/')
            .map_or(self.relative.as_str(), |(_, name)| name)
    }
}

/// Lazy depth-first walk yielding only files the filter accepts.
///
/// Symbolic links are followed; link cycles are reported by `walkdir` as
/// errors, logged, and skipped. Directories matching an exclude-path pattern
/// are pruned without being read.
pub struct Walker<'a> {
    root: PathBuf,
    filter: &'a FilterConfig,
    entries: walkdir::IntoIter,
}

impl<'a> Walker<'a> {
    pub fn new(root: impl Into<PathBuf>, filter: &'a FilterConfig) -> Self {
        let root = root.into();
        let entries = WalkDir::new(&root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();
        Self {
            root,
            filter,
            entries,
        }
    }
}

impl Iterator for Walker<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    if err.loop_ancestor().is_some() {
                        warn!("skipping symlink cycle: {}", err);
                    } else {
                        warn!("walk error: {}", err);
                    }
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let relative = relative_path(&self.root, entry.path());

            if entry.file_type().is_dir() {
                if is_vcs_dir(entry.file_name()) || self.filter.is_path_excluded(&relative) {
                    debug!("pruning directory {}", relative);
                    self.entries.skip_current_dir();
                }
                continue;
            }

            if !entry.file_type().is_file() {
                continue;
            }

            let extension = entry
                .path()
                .extension()
                .map(|e| e.to_string_lossy().into_owned());

            if !self.filter.is_eligible(&relative, extension.as_deref()) {
                continue;
            }

            return Some(Candidate {
                path: entry.into_path(),
                relative,
                extension,
            });
        }
    }
}

fn is_vcs_dir(name: &OsStr) -> bool {
    name.to_str().is_some_and(|n| VCS_DIRS.contains(&n))
}

/// `root/a/b.go` becomes `a/b.go` on every platform.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
