use std::io;

use thiserror::Error;

use crate::PackageName;

pub type Result<T, E = PipError> = std::result::Result<T, E>;

/// Payload-free discriminant of [`PipError`], for callers deciding whether
/// to retry, report, or abort a larger batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PackageNotFound,
    InvalidManifest,
    NotExplicitlyInstalled,
    NotInstalled,
    StillNeeded,
    MissingDependency,
    UnsatisfiedImport,
    DependencyCycle,
    ImportParse,
    InvalidName,
    NameConflict,
    InvalidConfig,
    Workspace,
    RepairFailed,
}

#[derive(Debug, Error)]
pub enum PipError {
    #[error("package '{name}' was not found in the package source")]
    PackageNotFound { name: PackageName },

    #[error("package '{name}' has an invalid manifest: {reason}")]
    InvalidManifest { name: PackageName, reason: String },

    #[error("package '{name}' is not installed explicitly, so it cannot be removed")]
    NotExplicitlyInstalled { name: PackageName },

    #[error("package '{name}' is not installed")]
    NotInstalled { name: PackageName },

    #[error("cannot remove '{name}' because {} need it", join_names(.needed_by))]
    StillNeeded {
        name: PackageName,
        needed_by: Vec<PackageName>,
    },

    #[error("package '{name}' should be installed but it is missing")]
    MissingDependency { name: PackageName },

    #[error("unsatisfied import '{path}'")]
    UnsatisfiedImport { path: String },

    #[error("dependency cycle detected: {}", join_cycle(.cycle))]
    DependencyCycle { cycle: Vec<PackageName> },

    #[error("failed to parse imports at line {line}: {reason}")]
    ImportParse { line: u32, reason: String },

    #[error("invalid package name '{value}': {reason}")]
    InvalidName { value: String, reason: &'static str },

    #[error("package '{name}' conflicts with '{conflicts_with}': one is nested inside the other")]
    NameConflict {
        name: PackageName,
        conflicts_with: PackageName,
    },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("workspace {op} failed for '{path}': {source}")]
    Workspace {
        op: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("repair of '{name}' failed: {source}")]
    RepairFailed {
        name: PackageName,
        #[source]
        source: Box<PipError>,
    },
}

impl PipError {
    pub fn workspace(op: &'static str, path: impl Into<String>, source: io::Error) -> Self {
        Self::Workspace {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PackageNotFound { .. } => ErrorKind::PackageNotFound,
            Self::InvalidManifest { .. } => ErrorKind::InvalidManifest,
            Self::NotExplicitlyInstalled { .. } => ErrorKind::NotExplicitlyInstalled,
            Self::NotInstalled { .. } => ErrorKind::NotInstalled,
            Self::StillNeeded { .. } => ErrorKind::StillNeeded,
            Self::MissingDependency { .. } => ErrorKind::MissingDependency,
            Self::UnsatisfiedImport { .. } => ErrorKind::UnsatisfiedImport,
            Self::DependencyCycle { .. } => ErrorKind::DependencyCycle,
            Self::ImportParse { .. } => ErrorKind::ImportParse,
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::NameConflict { .. } => ErrorKind::NameConflict,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::Workspace { .. } => ErrorKind::Workspace,
            Self::RepairFailed { .. } => ErrorKind::RepairFailed,
        }
    }

    /// Stable reason code used as a prefix when rendering errors.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::PackageNotFound => "package-not-found",
            ErrorKind::InvalidManifest => "invalid-manifest",
            ErrorKind::NotExplicitlyInstalled => "not-explicitly-installed",
            ErrorKind::NotInstalled => "not-installed",
            ErrorKind::StillNeeded => "still-needed",
            ErrorKind::MissingDependency => "missing-dependency",
            ErrorKind::UnsatisfiedImport => "unsatisfied-import",
            ErrorKind::DependencyCycle => "dependency-cycle",
            ErrorKind::ImportParse => "import-parse",
            ErrorKind::InvalidName => "invalid-name",
            ErrorKind::NameConflict => "name-conflict",
            ErrorKind::InvalidConfig => "invalid-config",
            ErrorKind::Workspace => "workspace-io",
            ErrorKind::RepairFailed => "repair-failed",
        }
    }
}

fn join_names(names: &[PackageName]) -> String {
    let rendered = names
        .iter()
        .map(PackageName::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{rendered}]")
}

fn join_cycle(cycle: &[PackageName]) -> String {
    cycle
        .iter()
        .map(PackageName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
