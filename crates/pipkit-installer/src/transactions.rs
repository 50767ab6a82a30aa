use std::io;

use pipkit_core::{PackageName, PipError, Result};
use pipkit_registry::PackageSource;
use pipkit_tree::FileTree;
use tracing::{debug, warn};

use crate::PackageManager;

/// Workspace mutations staged by one install or repair call.
///
/// Nothing is recorded in the history set until `commit`; `rollback`
/// removes every package and parent directory the call created.
#[derive(Debug, Default)]
pub(crate) struct Materialization {
    mounted: Vec<PackageName>,
    created_dirs: Vec<String>,
}

impl Materialization {
    pub(crate) fn mounted(&self) -> &[PackageName] {
        &self.mounted
    }
}

impl<S: PackageSource + ?Sized, W: FileTree> PackageManager<'_, S, W> {
    /// Copies `name` into the workspace unless it is already there.
    pub(crate) fn materialize(
        &mut self,
        name: &PackageName,
        tx: &mut Materialization,
    ) -> Result<()> {
        if self.state.materialized.contains(name) {
            return Ok(());
        }
        self.ensure_no_overlap(name, &self.state.materialized)?;
        if self.workspace.exists(name.as_str()) {
            return Err(PipError::workspace(
                "mount",
                name.as_str(),
                io::Error::new(io::ErrorKind::AlreadyExists, "path already exists"),
            ));
        }

        let tree = self.source.fetch(name)?;
        self.ensure_parent_dirs(name, tx)?;
        if let Err(err) = self.workspace.mount(name.as_str(), &tree) {
            if let Err(cleanup_err) = self.workspace.remove(name.as_str()) {
                warn!(package = %name, error = %cleanup_err, "failed to clean up partial mount");
            }
            return Err(PipError::workspace("mount", name.as_str(), err));
        }

        self.state.materialized.insert(name.clone());
        tx.mounted.push(name.clone());
        debug!(package = %name, "materialized package");
        Ok(())
    }

    /// Fails with `NameConflict` when `name` would be nested inside, or
    /// contain, one of `others` in the workspace.
    pub(crate) fn ensure_no_overlap<'a>(
        &self,
        name: &PackageName,
        others: impl IntoIterator<Item = &'a PackageName>,
    ) -> Result<()> {
        match others.into_iter().find(|other| name.overlaps(other)) {
            Some(other) => Err(PipError::NameConflict {
                name: name.clone(),
                conflicts_with: other.clone(),
            }),
            None => Ok(()),
        }
    }

    fn ensure_parent_dirs(&mut self, name: &PackageName, tx: &mut Materialization) -> Result<()> {
        for dir in name.ancestors() {
            if self.workspace.exists(dir) {
                continue;
            }
            self.workspace
                .create_dir(dir)
                .map_err(|err| PipError::workspace("create", dir, err))?;
            tx.created_dirs.push(dir.to_string());
        }
        Ok(())
    }

    /// Removes the now empty parent directories of a removed package,
    /// deepest first.
    pub(crate) fn prune_empty_parents(&mut self, name: &PackageName) -> Result<()> {
        let ancestors = name.ancestors().collect::<Vec<_>>();
        for dir in ancestors.into_iter().rev() {
            if !self.is_empty_dir(dir) {
                break;
            }
            self.workspace
                .remove(dir)
                .map_err(|err| PipError::workspace("remove", dir, err))?;
        }
        Ok(())
    }

    fn is_empty_dir(&self, dir: &str) -> bool {
        let files = self.workspace.list_files(dir);
        let dirs = self.workspace.list_dirs(dir);
        matches!((files, dirs), (Ok(files), Ok(dirs)) if files.is_empty() && dirs.is_empty())
    }

    /// Makes the staged packages permanent and records them for search.
    pub(crate) fn commit(&mut self, tx: Materialization) {
        self.state.record_history(tx.mounted());
    }

    /// Undoes every mount of `tx`, newest first. Removal failures are
    /// logged; the tracking sets are restored regardless.
    pub(crate) fn rollback(&mut self, tx: Materialization) {
        warn!(mounted = tx.mounted.len(), "rolling back staged packages");
        for name in tx.mounted.iter().rev() {
            if let Err(err) = self.workspace.remove(name.as_str()) {
                warn!(package = %name, error = %err, "failed to remove staged package");
            }
            self.state.materialized.shift_remove(name);
        }
        for dir in tx.created_dirs.iter().rev() {
            if let Err(err) = self.workspace.remove(dir) {
                warn!(path = %dir, error = %err, "failed to remove staged directory");
            }
        }
    }
}
