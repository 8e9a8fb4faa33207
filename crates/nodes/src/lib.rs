//! `create-sample` orchestration.
//!
//! [`CreateProject`] sequences the build, generate, patch and install stages
//! over the port traits defined in [`pipeline`]. The only I/O done here is
//! the manifest rewrite and the working directory change; everything else is
//! delegated to whichever infrastructure the caller injects.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Stage order, span layout, and error mapping live
//! here. Manifest rules live in [`pipeline::manifest`]; process details live
//! in the `toolchain` crate.

pub mod create;
pub mod manifest_file;
pub mod workdir;

pub use create::{CreateProject, CreateRequest};
pub use manifest_file::{patch_manifest_file, MANIFEST_FILE};
pub use workdir::WorkingDirGuard;
