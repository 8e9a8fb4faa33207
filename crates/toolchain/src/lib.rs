//! `create-sample` infrastructure adapters.
//!
//! Implements the [`pipeline`] port traits over external processes:
//!
//! - [`CommandBuilder`]: runs the workspace build and assembles the
//!   [`pipeline::PackageRegistry`] from a [`RegistrySource`].
//! - [`CliGenerator`]: runs `ng new` (or a compatible generator).
//! - [`PackageManagerInstaller`]: runs `npm install` (or a compatible
//!   package manager).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Process spawning, output capture and failure logging
//! live here. The orchestration crate sees only the traits.

pub mod build;
pub mod generate;
pub mod install;
pub mod process;
pub mod registry;

pub use build::CommandBuilder;
pub use generate::{CliGenerator, NON_INTERACTIVE_FLAGS};
pub use install::PackageManagerInstaller;
pub use process::{failure_report, ProcessCommand};
pub use registry::RegistrySource;
