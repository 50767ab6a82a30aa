//! Package manager bound to one workspace and one package source.
//!
//! The manager tracks three sets for its lifetime: packages the user asked
//! for explicitly, packages currently present in the workspace, and every
//! package name it has ever handled (for search). After every successful
//! install, uninstall or fix, the materialized set is exactly the
//! dependency closure of the explicit set.

mod history;
mod imports;
mod install;
mod repair;
mod state;
mod transactions;
mod uninstall;

use pipkit_core::{GoImportScanner, ImportParser, ManagerConfig, PackageName, Result};
use pipkit_registry::PackageSource;
use pipkit_resolver::DependencyResolver;
use pipkit_tree::FileTree;

use crate::state::ManagerState;

pub struct PackageManager<'s, S: PackageSource + ?Sized, W: FileTree> {
    source: &'s S,
    workspace: W,
    config: ManagerConfig,
    state: ManagerState,
    import_parser: Box<dyn ImportParser>,
}

impl<'s, S: PackageSource + ?Sized, W: FileTree> PackageManager<'s, S, W> {
    /// Binds a manager to an empty `workspace` with the default config.
    pub fn new(workspace: W, source: &'s S) -> Self {
        Self {
            source,
            workspace,
            config: ManagerConfig::default(),
            state: ManagerState::default(),
            import_parser: Box::new(GoImportScanner),
        }
    }

    pub fn with_config(workspace: W, source: &'s S, config: ManagerConfig) -> Result<Self> {
        config.validate()?;
        let mut manager = Self::new(workspace, source);
        manager.config = config;
        Ok(manager)
    }

    /// Replaces the Go import scanner used by `import_check`.
    pub fn with_import_parser(mut self, parser: impl ImportParser + 'static) -> Self {
        self.import_parser = Box::new(parser);
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    pub fn into_workspace(self) -> W {
        self.workspace
    }

    /// Explicitly installed packages in request order.
    pub fn explicit_packages(&self) -> Vec<PackageName> {
        self.state.explicit.iter().cloned().collect()
    }

    /// Packages present in the workspace in materialization order.
    pub fn materialized_packages(&self) -> Vec<PackageName> {
        self.state.materialized.iter().cloned().collect()
    }

    pub fn history(&self) -> Vec<PackageName> {
        self.state.history.iter().cloned().collect()
    }

    pub fn is_explicit(&self, name: &str) -> bool {
        self.state.explicit.contains(name)
    }

    pub fn is_materialized(&self, name: &str) -> bool {
        self.state.materialized.contains(name)
    }

    fn resolver(&self) -> DependencyResolver<'s, S> {
        DependencyResolver::with_manifest_file(self.source, self.config.manifest_file.as_str())
    }
}

fn parse_names<N: AsRef<str>>(names: &[N]) -> Result<Vec<PackageName>> {
    names
        .iter()
        .map(|name| PackageName::new(name.as_ref()))
        .collect()
}
