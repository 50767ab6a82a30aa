use pipkit_core::{parse_requirements, PipError, Result};
use pipkit_registry::PackageSource;
use pipkit_tree::FileTree;
use tracing::{info, warn};

use crate::transactions::Materialization;
use crate::{parse_names, PackageManager};

impl<S: PackageSource + ?Sized, W: FileTree> PackageManager<'_, S, W> {
    /// Installs `names` and their dependency closures as one batch.
    ///
    /// Every closure is resolved, and checked for names nested inside one
    /// another, before the workspace is touched. A failure while copying rolls
    /// back every package this call materialized.
    pub fn install<N: AsRef<str>>(&mut self, names: &[N]) -> Result<()> {
        let requested = parse_names(names)?;

        let mut resolver = self.resolver();
        let mut plans = Vec::with_capacity(requested.len());
        for name in &requested {
            plans.push(resolver.resolve(name)?);
        }

        let mut planned = Vec::new();
        for name in plans.iter().flat_map(|plan| &plan.order) {
            if self.state.materialized.contains(name) || planned.contains(&name) {
                continue;
            }
            self.ensure_no_overlap(name, &self.state.materialized)?;
            self.ensure_no_overlap(name, planned.iter().copied())?;
            planned.push(name);
        }

        let mut tx = Materialization::default();
        for plan in &plans {
            for name in &plan.order {
                if let Err(err) = self.materialize(name, &mut tx) {
                    warn!(package = %name, error = %err, "install failed while materializing");
                    self.rollback(tx);
                    return Err(err);
                }
            }
        }

        let added = tx.mounted().len();
        self.commit(tx);
        for name in &requested {
            self.state.explicit.insert(name.clone());
        }
        self.state.record_history(&requested);
        info!(
            requested = requested.len(),
            materialized = added,
            "installed packages"
        );
        Ok(())
    }

    /// Installs every name listed in `file` of `tree` as one batch.
    pub fn install_requirements<T: FileTree + ?Sized>(
        &mut self,
        tree: &T,
        file: &str,
    ) -> Result<()> {
        let content = tree
            .read_file(file)
            .map_err(|err| PipError::workspace("read", file, err))?;
        let names = parse_requirements(&content)?;
        self.install(&names)
    }
}
