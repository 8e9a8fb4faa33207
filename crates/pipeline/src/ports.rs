//! Port traits for the external collaborators.
//!
//! The build, the project generator and the package manager are black boxes
//! to the pipeline. Infrastructure crates implement these traits over real
//! processes; tests implement them in memory.

use std::path::Path;

use async_trait::async_trait;

use crate::{BuildMode, CommandOutput, PackageRegistry, ProjectName, StageError};

/// Builds the local packages and reports which artifact belongs to which
/// package.
#[async_trait]
pub trait PackageBuilder: Send + Sync {
    /// Runs the build to completion.
    ///
    /// The returned registry is the only channel through which build results
    /// reach later stages.
    async fn build(&self, mode: BuildMode) -> Result<PackageRegistry, StageError>;
}

/// Generates a new project skeleton.
#[async_trait]
pub trait ProjectGenerator: Send + Sync {
    /// Creates `<parent>/<name>` without installing dependencies, without
    /// initialising version control, and without prompting.
    async fn generate(&self, name: &ProjectName, parent: &Path) -> Result<(), StageError>;
}

/// Installs a project's dependencies.
#[async_trait]
pub trait DependencyInstaller: Send + Sync {
    /// Installs dependencies for the project rooted at `project_dir`.
    async fn install(&self, project_dir: &Path) -> Result<CommandOutput, StageError>;
}
