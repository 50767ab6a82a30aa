mod directory;
mod memory;

use pipkit_core::{PackageName, Result};
use pipkit_tree::MemoryTree;

pub use directory::DirectorySource;
pub use memory::MemorySource;

/// Pull-based package registry.
///
/// Every `fetch` returns a freshly copied tree the caller owns; mutating it
/// never affects the source, so one source can back many managers.
pub trait PackageSource {
    /// Fails with `PackageNotFound` when the source has no such package.
    fn fetch(&self, name: &PackageName) -> Result<MemoryTree>;
}

impl<T: PackageSource + ?Sized> PackageSource for &T {
    fn fetch(&self, name: &PackageName) -> Result<MemoryTree> {
        (**self).fetch(name)
    }
}
