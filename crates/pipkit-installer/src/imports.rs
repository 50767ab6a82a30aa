use pipkit_core::{PipError, Result};
use pipkit_registry::PackageSource;
use pipkit_tree::FileTree;
use tracing::debug;

use crate::PackageManager;

impl<S: PackageSource + ?Sized, W: FileTree> PackageManager<'_, S, W> {
    /// Verifies every import of `source_text` is either standard library or
    /// a materialized package. Fails on the first one that is neither.
    pub fn import_check(&self, source_text: &str) -> Result<()> {
        let imports = self.import_parser.extract_imports(source_text)?;
        debug!(imports = imports.len(), "checking imports");
        for path in imports {
            if self.config.is_std_import(&path) || self.state.materialized.contains(path.as_str()) {
                continue;
            }
            return Err(PipError::UnsatisfiedImport { path });
        }
        Ok(())
    }
}
