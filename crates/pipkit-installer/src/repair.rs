use indexmap::IndexSet;
use pipkit_core::{PackageName, PipError, Result};
use pipkit_registry::PackageSource;
use pipkit_resolver::DependencyResolver;
use pipkit_tree::FileTree;
use tracing::{debug, info, warn};

use crate::transactions::Materialization;
use crate::PackageManager;

impl<'s, S: PackageSource + ?Sized, W: FileTree> PackageManager<'s, S, W> {
    /// The explicit packages followed by everything they transitively need.
    pub fn needed_closure(&self) -> Result<Vec<PackageName>> {
        Ok(self.needed_set()?.into_iter().collect())
    }

    /// Materialized packages outside the needed closure.
    pub fn find_danglings(&self) -> Result<Vec<PackageName>> {
        let needed = self.needed_set()?;
        Ok(self.danglings_against(&needed))
    }

    /// Fails with `MissingDependency` naming the first needed package that
    /// is not materialized.
    pub fn check(&self) -> Result<()> {
        let needed = self.needed_set()?;
        match needed
            .iter()
            .find(|name| !self.state.materialized.contains(*name))
        {
            Some(missing) => Err(PipError::MissingDependency {
                name: missing.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Removes dangling packages, then restores missing needed ones without
    /// making them explicit.
    ///
    /// The needed closure was valid when the explicit packages were
    /// installed, so any failure here is reported as `RepairFailed` for the
    /// package being repaired. Restored packages are rolled back together.
    pub fn fix(&mut self) -> Result<()> {
        let mut resolver = self.resolver();
        let needed = self.repair_plan(&mut resolver)?;

        for dangling in self.danglings_against(&needed) {
            self.force_remove(std::slice::from_ref(&dangling))
                .map_err(|err| PipError::RepairFailed {
                    name: dangling.clone(),
                    source: Box::new(err),
                })?;
            debug!(package = %dangling, "removed dangling package");
        }

        let missing = needed
            .iter()
            .filter(|name| !self.state.materialized.contains(*name))
            .cloned()
            .collect::<Vec<_>>();
        if missing.is_empty() {
            return Ok(());
        }

        let mut tx = Materialization::default();
        for name in &missing {
            if let Err(err) = self.restore(&mut resolver, name, &mut tx) {
                warn!(package = %name, error = %err, "repair failed");
                self.rollback(tx);
                return Err(PipError::RepairFailed {
                    name: name.clone(),
                    source: Box::new(err),
                });
            }
        }

        let restored = tx.mounted().len();
        self.commit(tx);
        info!(restored, "repaired workspace");
        Ok(())
    }

    fn needed_set(&self) -> Result<IndexSet<PackageName>> {
        self.resolver().closure(&self.state.explicit)
    }

    fn repair_plan(
        &self,
        resolver: &mut DependencyResolver<'s, S>,
    ) -> Result<IndexSet<PackageName>> {
        let mut needed = self.state.explicit.clone();
        for root in &self.state.explicit {
            let resolution = resolver.resolve(root).map_err(|err| PipError::RepairFailed {
                name: root.clone(),
                source: Box::new(err),
            })?;
            needed.extend(resolution.order);
        }
        Ok(needed)
    }

    fn restore(
        &mut self,
        resolver: &mut DependencyResolver<'s, S>,
        name: &PackageName,
        tx: &mut Materialization,
    ) -> Result<()> {
        let resolution = resolver.resolve(name)?;
        for pkg in &resolution.order {
            self.materialize(pkg, tx)?;
        }
        Ok(())
    }

    pub(crate) fn danglings_against(&self, needed: &IndexSet<PackageName>) -> Vec<PackageName> {
        self.state
            .materialized
            .iter()
            .filter(|name| !needed.contains(*name))
            .cloned()
            .collect()
    }
}
