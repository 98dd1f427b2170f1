//! Acquisition of scan roots.
//!
//! Fetching a tree (cloning a remote at a branch, unpacking an archive) is
//! done by a [`Provisioner`]. The scan only ever sees the local directory it
//! returns, and hands that directory back to the caller so the caller can
//! remove it. Nothing in this crate deletes a provisioned root.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::PolylocError;
use crate::Result;

/// Hosting platform a repository record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    GitHub,
    GitLab,
    Bitbucket,
    BitbucketDataCenter,
    AzureDevOps,
    Local,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::GitHub => "github",
            Provider::GitLab => "gitlab",
            Provider::Bitbucket => "bitbucket",
            Provider::BitbucketDataCenter => "bitbucket_dc",
            Provider::AzureDevOps => "azure",
            Provider::Local => "local",
        };
        f.write_str(name)
    }
}

/// One repository, in the same shape whatever platform listed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub provider: Provider,
    /// Platform identifier (numeric ids are kept as text)
    pub id: String,
    /// Repository name or slug
    pub name: String,
    /// Full path: `namespace/name`, or a local directory for [`Provider::Local`]
    pub path: String,
    pub default_branch: Option<String>,
}

impl RepoRef {
    pub fn new(
        provider: Provider,
        id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            id: id.into(),
            name: name.into(),
            path: path.into(),
            default_branch: None,
        }
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    /// Namespace part of the path (`org` in `org/repo`), if any.
    pub fn project(&self) -> Option<&str> {
        if self.provider == Provider::Local {
            return None;
        }
        self.path
            .rsplit_once('/')
            .map(|(project, _)| project)
            .filter(|p| !p.is_empty())
    }

    /// Artifact base name: `Result_<project>_<repo>_<branch>`, leaving out
    /// the parts that are unknown.
    pub fn report_name(&self) -> String {
        let mut name = String::from("Result");
        for part in [self.project(), Some(self.name.as_str()), self.default_branch.as_deref()]
            .into_iter()
            .flatten()
        {
            name.push('_');
            name.push_str(&part.replace(['/', '\\'], "_"));
        }
        name
    }
}

/// Collaborator that turns a source location into a local directory.
pub trait Provisioner {
    /// Make `location` available locally at `branch` and return its root.
    fn provision(&self, location: &str, branch: Option<&str>) -> Result<PathBuf>;

    fn provision_repo(&self, repo: &RepoRef) -> Result<PathBuf> {
        self.provision(&repo.path, repo.default_branch.as_deref())
    }
}

/// Provisioner for trees that are already on disk.
///
/// A root that is a symbolic link is replaced by its target. The branch is
/// not interpreted.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProvisioner;

impl Provisioner for LocalProvisioner {
    fn provision(&self, location: &str, branch: Option<&str>) -> Result<PathBuf> {
        let acquisition_error = |message: String| PolylocError::Acquisition {
            location: location.to_string(),
            message,
        };

        if let Some(branch) = branch {
            debug!("local checkout {}: branch {} taken as-is", location, branch);
        }

        let path = resolve_root_link(Path::new(location))
            .map_err(|e| acquisition_error(e.to_string()))?;
        let root = fs::canonicalize(&path).map_err(|e| acquisition_error(e.to_string()))?;
        if !root.is_dir() {
            return Err(acquisition_error("not a directory".to_string()));
        }
        Ok(root)
    }
}

fn resolve_root_link(path: &Path) -> std::io::Result<PathBuf> {
    let metadata = fs::symlink_metadata(path)?;
    if !metadata.file_type().is_symlink() {
        return Ok(path.to_path_buf());
    }

    let target = fs::read_link(path)?;
    debug!("{} is a link to {}", path.display(), target.display());
    if target.is_absolute() {
        Ok(target)
    } else {
        Ok(path
            .parent()
            .map_or_else(|| target.clone(), |parent| parent.join(&target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_report_name_full() {
        let repo = RepoRef::new(Provider::BitbucketDataCenter, "42", "api", "PROJ/api")
            .with_default_branch("main");
        assert_eq!(repo.report_name(), "Result_PROJ_api_main");
    }

    #[test]
    fn test_report_name_without_namespace_or_branch() {
        let repo = RepoRef::new(Provider::GitHub, "7", "tool", "tool");
        assert_eq!(repo.project(), None);
        assert_eq!(repo.report_name(), "Result_tool");
    }

    #[test]
    fn test_report_name_sanitizes_branch() {
        let repo = RepoRef::new(Provider::GitLab, "1", "web", "group/sub/web")
            .with_default_branch("release/2.0");
        assert_eq!(repo.project(), Some("group/sub"));
        assert_eq!(repo.report_name(), "Result_group_sub_web_release_2.0");
    }

    #[test]
    fn test_local_repo_has_no_project() {
        let repo = RepoRef::new(Provider::Local, "", "work", "/home/me/work");
        assert_eq!(repo.report_name(), "Result_work");
    }

    #[test]
    fn test_local_provisioner_resolves_directory() {
        let dir = tempdir().unwrap();
        let location = dir.path().to_string_lossy().into_owned();

        let root = LocalProvisioner.provision(&location, Some("main")).unwrap();
        assert_eq!(root, fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_local_provisioner_missing() {
        let result = LocalProvisioner.provision("/nonexistent/polyloc/checkout", None);
        assert!(matches!(result, Err(PolylocError::Acquisition { .. })));
    }

    #[test]
    fn test_local_provisioner_rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let result = LocalProvisioner.provision(&file.to_string_lossy(), None);
        assert!(matches!(result, Err(PolylocError::Acquisition { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_local_provisioner_follows_root_link() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("checkout");
        fs::create_dir(&target).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("checkout", &link).unwrap();

        let repo = RepoRef::new(Provider::Local, "", "link", link.to_string_lossy());
        let root = LocalProvisioner.provision_repo(&repo).unwrap();
        assert_eq!(root, fs::canonicalize(&target).unwrap());
    }
}
