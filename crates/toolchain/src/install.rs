//! Dependency installer adapter (`npm install` and compatible CLIs).

use std::path::Path;

use async_trait::async_trait;
use pipeline::{CommandOutput, DependencyInstaller, StageError};

use crate::process::ProcessCommand;

/// [`DependencyInstaller`] that runs `<program> <args..>` inside the project.
#[derive(Debug, Clone)]
pub struct PackageManagerInstaller {
    program: String,
    args: Vec<String>,
}

impl PackageManagerInstaller {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `npm install`.
    pub fn npm() -> Self {
        Self::new("npm", vec!["install".to_string()])
    }
}

#[async_trait]
impl DependencyInstaller for PackageManagerInstaller {
    async fn install(&self, project_dir: &Path) -> Result<CommandOutput, StageError> {
        ProcessCommand::new(self.program.clone())
            .args(self.args.iter().cloned())
            .current_dir(project_dir)
            .run_captured()
            .await
    }
}
