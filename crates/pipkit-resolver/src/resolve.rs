use std::collections::{BTreeSet, HashMap};

use indexmap::IndexSet;
use pipkit_core::{parse_requirements, PackageName, PipError, Result, MANIFEST_FILE};
use pipkit_registry::PackageSource;
use pipkit_tree::FileTree;
use tracing::debug;

use crate::order::visit_dependency_first;
use crate::types::Resolution;

/// Reads manifests from a package source and expands transitive closures.
///
/// Direct dependency lists are cached for the lifetime of the resolver, so
/// a resolver should live for one operation: the dependency graph is
/// rediscovered from the source on every new operation.
pub struct DependencyResolver<'s, S: PackageSource + ?Sized> {
    source: &'s S,
    manifest_file: String,
    direct_cache: HashMap<PackageName, Vec<PackageName>>,
}

impl<'s, S: PackageSource + ?Sized> DependencyResolver<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self::with_manifest_file(source, MANIFEST_FILE)
    }

    pub fn with_manifest_file(source: &'s S, manifest_file: impl Into<String>) -> Self {
        Self {
            source,
            manifest_file: manifest_file.into(),
            direct_cache: HashMap::new(),
        }
    }

    /// Direct dependencies in manifest order, duplicates included.
    pub fn direct_deps(&mut self, name: &PackageName) -> Result<Vec<PackageName>> {
        if let Some(cached) = self.direct_cache.get(name) {
            return Ok(cached.clone());
        }

        let deps = self.read_manifest(name)?;
        self.direct_cache.insert(name.clone(), deps.clone());
        Ok(deps)
    }

    fn read_manifest(&self, name: &PackageName) -> Result<Vec<PackageName>> {
        let tree = self.source.fetch(name)?;
        let content = tree
            .read_file(&self.manifest_file)
            .map_err(|err| PipError::InvalidManifest {
                name: name.clone(),
                reason: format!("cannot read {}: {err}", self.manifest_file),
            })?;
        let deps = parse_requirements(&content).map_err(|err| PipError::InvalidManifest {
            name: name.clone(),
            reason: err.to_string(),
        })?;
        debug!(package = %name, direct = deps.len(), "read package manifest");
        Ok(deps)
    }

    /// Full closure of `name` in dependency-first order.
    ///
    /// Fails with the first error met while expanding, including the root's
    /// own lookup, and with `DependencyCycle` when the graph loops back.
    pub fn resolve(&mut self, name: &PackageName) -> Result<Resolution> {
        let mut marks = HashMap::new();
        let mut order = Vec::new();
        let mut load = |pkg: &PackageName| self.direct_deps(pkg);
        visit_dependency_first(name, &mut marks, &mut order, &mut load)?;

        debug!(package = %name, closure = order.len().saturating_sub(1), "resolved dependencies");
        Ok(Resolution {
            root: name.clone(),
            order,
        })
    }

    /// Transitive dependencies of `name`, excluding `name` itself.
    pub fn all_deps(&mut self, name: &PackageName) -> Result<BTreeSet<PackageName>> {
        Ok(self.resolve(name)?.dependency_set())
    }

    /// The roots followed by everything they transitively need.
    ///
    /// Roots keep their given order; the remaining members follow in
    /// dependency-first order per root.
    pub fn closure<'a, I>(&mut self, roots: I) -> Result<IndexSet<PackageName>>
    where
        I: IntoIterator<Item = &'a PackageName>,
    {
        let roots = roots.into_iter().cloned().collect::<IndexSet<_>>();
        let mut marks = HashMap::new();
        let mut order = Vec::new();
        let mut load = |pkg: &PackageName| self.direct_deps(pkg);
        for root in &roots {
            visit_dependency_first(root, &mut marks, &mut order, &mut load)?;
        }

        let mut closure = roots;
        closure.extend(order);
        Ok(closure)
    }
}
