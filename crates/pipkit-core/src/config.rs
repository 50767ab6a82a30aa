use serde::{Deserialize, Serialize};

use crate::error::{PipError, Result};
use crate::manifest::MANIFEST_FILE;

/// Top-level Go standard-library namespaces exempt from the import check.
pub const DEFAULT_STD_NAMESPACES: &[&str] = &[
    "archive",
    "bufio",
    "builtin",
    "bytes",
    "compress",
    "container",
    "context",
    "crypto",
    "database",
    "debug",
    "embed",
    "encoding",
    "errors",
    "expvar",
    "flag",
    "fmt",
    "go",
    "hash",
    "html",
    "image",
    "io",
    "log",
    "math",
    "mime",
    "net",
    "os",
    "path",
    "plugin",
    "reflect",
    "regexp",
    "runtime",
    "sort",
    "strconv",
    "strings",
    "sync",
    "syscall",
    "testing",
    "text",
    "time",
    "unicode",
    "unsafe",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagerConfig {
    pub manifest_file: String,
    pub std_namespaces: Vec<String>,
    pub search_limit: Option<usize>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            manifest_file: MANIFEST_FILE.to_string(),
            std_namespaces: DEFAULT_STD_NAMESPACES
                .iter()
                .map(|namespace| (*namespace).to_string())
                .collect(),
            search_limit: None,
        }
    }
}

impl ManagerConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).map_err(|err| PipError::InvalidConfig {
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|err| PipError::InvalidConfig {
            reason: err.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        let manifest = self.manifest_file.trim();
        if manifest.is_empty() {
            return Err(PipError::InvalidConfig {
                reason: "manifest_file must not be empty".to_string(),
            });
        }
        if manifest.starts_with('/')
            || manifest.contains('\\')
            || manifest
                .split('/')
                .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(PipError::InvalidConfig {
                reason: format!("manifest_file must be a plain relative path: {manifest}"),
            });
        }
        if let Some(empty) = self
            .std_namespaces
            .iter()
            .position(|namespace| namespace.trim().is_empty() || namespace.contains('/'))
        {
            return Err(PipError::InvalidConfig {
                reason: format!("std_namespaces[{empty}] must be a single non-empty segment"),
            });
        }
        if self.search_limit == Some(0) {
            return Err(PipError::InvalidConfig {
                reason: "search_limit must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }

    /// An import is standard when its first `/` segment is an allow-listed
    /// namespace: `net/http` matches `net`, `netfoo` does not.
    pub fn is_std_import(&self, path: &str) -> bool {
        let head = path.split('/').next().unwrap_or(path);
        self.std_namespaces
            .iter()
            .any(|namespace| namespace.as_str() == head)
    }
}
