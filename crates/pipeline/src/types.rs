//! Shared value types for the create-sample domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the data that flows between stages: the build registry produced by the
//! build stage, and the outcome of external commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::PackageName;

// ---------------------------------------------------------------------------
// Build registry
// ---------------------------------------------------------------------------

/// Reference to a built package artifact (usually an absolute tarball path).
///
/// Written verbatim into the manifest in place of a version specifier, so
/// anything npm accepts as a dependency specifier is valid here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactLocator(String);

impl ArtifactLocator {
    /// Creates a locator, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the locator as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ArtifactLocator> for String {
    fn from(locator: ArtifactLocator) -> String {
        locator.0
    }
}

impl TryFrom<String> for ArtifactLocator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "artifact locator must not be empty".to_string())
    }
}

impl std::fmt::Display for ArtifactLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// Mapping from package name to the artifact the local build produced for it.
///
/// Produced once by the build stage and handed to the patch stage; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageRegistry(BTreeMap<PackageName, ArtifactLocator>);

impl PackageRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the artifact for `name`, replacing any previous entry.
    pub fn insert(&mut self, name: PackageName, locator: ArtifactLocator) {
        self.0.insert(name, locator);
    }

    /// Iterates over `(name, locator)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&PackageName, &ArtifactLocator)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PackageName, ArtifactLocator)> for PackageRegistry {
    fn from_iter<T: IntoIterator<Item = (PackageName, ArtifactLocator)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Build mode
// ---------------------------------------------------------------------------

/// Which flavour of artifacts the build stage should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    /// Artifacts for in-workspace consumption (tarballs referenced by path).
    Local,
    /// Artifacts as they would be published.
    Release,
}

// ---------------------------------------------------------------------------
// External command results
// ---------------------------------------------------------------------------

/// How an external process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStatusCode {
    /// The process exited with this code.
    Code(i32),
    /// The process was terminated without an exit code (e.g. by a signal).
    Signal,
}

impl ExitStatusCode {
    /// Returns `true` for exit code 0.
    pub fn is_success(self) -> bool {
        self == Self::Code(0)
    }
}

impl From<Option<i32>> for ExitStatusCode {
    fn from(code: Option<i32>) -> Self {
        code.map_or(Self::Signal, Self::Code)
    }
}

impl std::fmt::Display for ExitStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Signal => write!(f, "signal"),
        }
    }
}

// ---------------------------------------------------------------------------

/// Captured output of an external command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}
