use std::collections::HashSet;

use pipkit_core::{PackageName, PipError, Result};
use pipkit_registry::PackageSource;
use pipkit_resolver::DependencyResolver;
use pipkit_tree::FileTree;
use tracing::{debug, info};

use crate::{parse_names, PackageManager};

impl<'s, S: PackageSource + ?Sized, W: FileTree> PackageManager<'s, S, W> {
    /// Removes explicitly installed packages, then any dependency no
    /// remaining explicit package needs.
    ///
    /// The whole batch is rejected when one name is not explicit or is
    /// still needed by an explicit package outside the batch.
    pub fn uninstall<N: AsRef<str>>(&mut self, names: &[N]) -> Result<()> {
        let targets = parse_names(names)?;
        for name in &targets {
            if !self.state.explicit.contains(name) {
                return Err(PipError::NotExplicitlyInstalled { name: name.clone() });
            }
        }

        let removing = targets.iter().collect::<HashSet<_>>();
        let mut resolver = self.resolver();
        for name in &targets {
            let needed_by = self.dependents_of(&mut resolver, name, &removing)?;
            if !needed_by.is_empty() {
                return Err(PipError::StillNeeded {
                    name: name.clone(),
                    needed_by,
                });
            }
        }

        self.force_remove(&targets)?;
        let pruned = self.remove_danglings()?;
        info!(
            removed = targets.len(),
            pruned = pruned.len(),
            "uninstalled packages"
        );
        Ok(())
    }

    /// Removes materialized packages without checking who needs them.
    pub fn force_uninstall<N: AsRef<str>>(&mut self, names: &[N]) -> Result<()> {
        let targets = parse_names(names)?;
        self.force_remove(&targets)
    }

    /// Explicit packages, other than `name`, whose closure contains `name`.
    pub fn blocked_by(&self, name: &str) -> Result<Vec<PackageName>> {
        let name = PackageName::new(name)?;
        let mut resolver = self.resolver();
        self.dependents_of(&mut resolver, &name, &HashSet::new())
    }

    pub(crate) fn force_remove(&mut self, targets: &[PackageName]) -> Result<()> {
        for name in targets {
            if !self.state.materialized.contains(name) {
                return Err(PipError::NotInstalled { name: name.clone() });
            }
        }

        for name in targets {
            self.workspace
                .remove(name.as_str())
                .map_err(|err| PipError::workspace("remove", name.as_str(), err))?;
            self.state.explicit.shift_remove(name);
            self.state.materialized.shift_remove(name);
            self.prune_empty_parents(name)?;
            debug!(package = %name, "removed package from workspace");
        }
        Ok(())
    }

    /// Force-removes every dangling package and returns what was removed.
    pub(crate) fn remove_danglings(&mut self) -> Result<Vec<PackageName>> {
        let danglings = self.find_danglings()?;
        if !danglings.is_empty() {
            debug!(count = danglings.len(), "removing dangling packages");
            self.force_remove(&danglings)?;
        }
        Ok(danglings)
    }

    fn dependents_of(
        &self,
        resolver: &mut DependencyResolver<'s, S>,
        name: &PackageName,
        excluded: &HashSet<&PackageName>,
    ) -> Result<Vec<PackageName>> {
        let mut dependents = Vec::new();
        for root in &self.state.explicit {
            if root == name || excluded.contains(root) {
                continue;
            }
            if resolver.resolve(root)?.depends_on(name.as_str()) {
                dependents.push(root.clone());
            }
        }
        dependents.sort();
        Ok(dependents)
    }
}
