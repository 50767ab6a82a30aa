use std::path::{Path, PathBuf};

use pipkit_core::{PackageName, PipError, Result};
use pipkit_tree::{DirTree, FileTree, MemoryTree};
use tracing::debug;

use crate::PackageSource;

/// Package source reading `<root>/<name>/` directories.
///
/// Path-like names (`github.com/acme/jwt`) map to nested directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package_dir(&self, name: &PackageName) -> PathBuf {
        name.as_str()
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

impl PackageSource for DirectorySource {
    fn fetch(&self, name: &PackageName) -> Result<MemoryTree> {
        let package_dir = self.package_dir(name);
        if !package_dir.is_dir() {
            return Err(PipError::PackageNotFound { name: name.clone() });
        }

        debug!(
            package = %name,
            path = %package_dir.display(),
            "fetching package from directory source"
        );
        let tree = DirTree::existing(&package_dir)
            .and_then(|tree| tree.snapshot())
            .map_err(|err| PipError::workspace("fetch", package_dir.display().to_string(), err))?;
        Ok(tree)
    }
}
