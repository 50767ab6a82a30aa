use std::collections::BTreeMap;

use pipkit_core::{render_requirements, PackageName, PipError, Result, MANIFEST_FILE};
use pipkit_tree::{FileTree, MemoryTree};
use tracing::debug;

use crate::PackageSource;

/// Package source backed by an in-memory name → tree map.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    packages: BTreeMap<PackageName, MemoryTree>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `tree` under `name`, replacing any previous tree.
    pub fn publish(&mut self, name: PackageName, tree: MemoryTree) {
        self.packages.insert(name, tree);
    }

    /// Publishes a minimal project: a `requirements.txt` listing `deps`
    /// (one per line, newline-terminated) and a `src/main.go` stub.
    pub fn publish_project(&mut self, name: &str, deps: &[&str]) -> Result<()> {
        let name = PackageName::new(name)?;
        let deps = deps
            .iter()
            .map(|dep| PackageName::new(*dep))
            .collect::<Result<Vec<_>>>()?;
        let tree = project_tree(&deps)
            .map_err(|err| PipError::workspace("publish", name.as_str(), err))?;
        self.publish(name, tree);
        Ok(())
    }

    pub fn with_project(mut self, name: &str, deps: &[&str]) -> Result<Self> {
        self.publish_project(name, deps)?;
        Ok(self)
    }

    pub fn unpublish(&mut self, name: &str) -> Option<MemoryTree> {
        self.packages.remove(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

fn project_tree(deps: &[PackageName]) -> std::io::Result<MemoryTree> {
    let mut tree = MemoryTree::new();
    tree.create_file(MANIFEST_FILE)?;
    tree.write_file(MANIFEST_FILE, &render_requirements(deps))?;
    tree.create_dir("src")?;
    tree.create_file("src/main.go")?;
    tree.append_file("src/main.go", "package main\n")?;
    Ok(tree)
}

impl PackageSource for MemorySource {
    fn fetch(&self, name: &PackageName) -> Result<MemoryTree> {
        debug!(package = %name, "fetching package from memory source");
        self.packages
            .get(name)
            .cloned()
            .ok_or_else(|| PipError::PackageNotFound { name: name.clone() })
    }
}
