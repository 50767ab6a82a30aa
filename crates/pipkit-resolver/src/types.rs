use std::collections::BTreeSet;

use pipkit_core::PackageName;

/// Transitive closure of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub root: PackageName,
    /// Dependency-first order: every package appears after all of its own
    /// dependencies, and `root` is last.
    pub order: Vec<PackageName>,
}

impl Resolution {
    /// Transitive dependencies, excluding the root itself.
    pub fn dependencies(&self) -> impl Iterator<Item = &PackageName> {
        self.order.iter().filter(move |name| **name != self.root)
    }

    pub fn dependency_set(&self) -> BTreeSet<PackageName> {
        self.dependencies().cloned().collect()
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies().any(|dep| dep.as_str() == name)
    }
}
