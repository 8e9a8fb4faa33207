//! Core domain for `create-sample`.
//!
//! `create-sample` builds the local packages, generates a throwaway project,
//! points that project's `package.json` at the freshly built artifacts, and
//! installs its dependencies. This crate holds the parts of that with no I/O:
//! identifiers, the build registry, the manifest patcher, errors, and the
//! port traits the infrastructure crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** No process spawning and no
//! filesystem access happens here.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ProjectName`, `PackageName`, `RunId`) |
//! | [`types`] | Shared value types (`PackageRegistry`, `ExitStatusCode`, etc.) |
//! | [`manifest`] | `package.json` patching |
//! | [`ports`] | Traits for the build, generator and installer |
//! | [`errors`] | Error types |

pub mod errors;
pub mod identifiers;
pub mod manifest;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{CreateError, ManifestError, StageError};
pub use identifiers::{PackageName, ProjectName, RunId};
pub use manifest::{DependencySection, PackageManifest, PatchReport, PatchedEntry};
pub use ports::{DependencyInstaller, PackageBuilder, ProjectGenerator};
pub use types::{ArtifactLocator, BuildMode, CommandOutput, ExitStatusCode, PackageRegistry};
