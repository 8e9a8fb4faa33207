//! Newtype domain identifiers.
//!
//! A project name and a package name are both strings, but mixing them up
//! would patch the wrong thing, so each gets its own type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value.clone())
                    .ok_or_else(|| format!("invalid {}: {value:?}", stringify!($name)))
            }
        }
    };
}

string_id! {
    /// Name of the project handed to the generator.
    ///
    /// The generator creates a directory of this name under the working
    /// directory, so the name must be a single path component.
    ProjectName
}

impl ProjectName {
    /// Creates a project name, returning `None` if the value is empty, is
    /// `.` or `..`, or contains a path separator.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        let single_component = !v.contains('/') && !v.contains('\\');
        if v.is_empty() || v == "." || v == ".." || !single_component {
            None
        } else {
            Some(Self(v))
        }
    }
}

string_id! {
    /// An npm package name (e.g. `"left-pad"`, `"@scope/core"`).
    PackageName
}

impl PackageName {
    /// Creates a package name, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// File stem used for the package's tarball in the dist directory.
    ///
    /// `@scope/core` becomes `scope_core`; unscoped names are unchanged.
    pub fn tarball_stem(&self) -> String {
        self.0.trim_start_matches('@').replace('/', "_")
    }
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single `create-sample` invocation.
///
/// Attached to the root tracing span so every event from one run can be
/// correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
