mod config;
mod error;
mod imports;
mod manifest;
mod name;

pub use config::{ManagerConfig, DEFAULT_STD_NAMESPACES};
pub use error::{ErrorKind, PipError, Result};
pub use imports::{scan_go_imports, GoImportScanner, ImportParser};
pub use manifest::{parse_requirements, render_requirements, MANIFEST_FILE};
pub use name::PackageName;

#[cfg(test)]
mod tests;
