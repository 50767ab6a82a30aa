use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipError, Result};

/// Unversioned, exact-match package identifier.
///
/// Names double as workspace directory names, so they may contain `/`
/// separated segments (`github.com/acme/jwt`) but never empty, `.` or `..`
/// segments, and never whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        validate_package_name(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Proper path prefixes of the name, shortest first:
    /// `github.com/acme/log` yields `github.com` then `github.com/acme`.
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.0.match_indices('/').map(|(index, _)| &self.0[..index])
    }

    /// True when one name is a directory inside the other's workspace path.
    pub fn overlaps(&self, other: &PackageName) -> bool {
        self.ancestors().any(|ancestor| ancestor == other.as_str())
            || other.ancestors().any(|ancestor| ancestor == self.as_str())
    }
}

fn validate_package_name(value: &str) -> Result<()> {
    let invalid = |reason: &'static str| PipError::InvalidName {
        value: value.to_string(),
        reason,
    };

    if value.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if value
        .chars()
        .any(|ch| ch.is_whitespace() || ch.is_control())
    {
        return Err(invalid("name must not contain whitespace"));
    }
    if value.contains('\\') {
        return Err(invalid("name must use '/' as its only separator"));
    }
    if value
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid("name must not contain empty, '.' or '..' segments"));
    }

    Ok(())
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for PackageName {
    type Err = PipError;

    fn from_str(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for PackageName {
    type Error = PipError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PackageName {
    type Error = PipError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PackageName> for String {
    fn from(value: PackageName) -> Self {
        value.0
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
