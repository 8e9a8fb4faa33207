//! Build stage adapter: runs the workspace build command, then reads the
//! registry of artifacts it produced.

use async_trait::async_trait;
use pipeline::{BuildMode, PackageBuilder, PackageRegistry, StageError};

use crate::process::ProcessCommand;
use crate::registry::RegistrySource;

/// [`PackageBuilder`] backed by an external build command.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    command: ProcessCommand,
    local_flag: Option<String>,
    source: RegistrySource,
}

impl CommandBuilder {
    /// `local_flag` is appended to the command for [`BuildMode::Local`].
    pub fn new(command: ProcessCommand, local_flag: Option<String>, source: RegistrySource) -> Self {
        Self {
            command,
            local_flag,
            source,
        }
    }

    fn command_for(&self, mode: BuildMode) -> ProcessCommand {
        match (mode, &self.local_flag) {
            (BuildMode::Local, Some(flag)) => self.command.clone().arg(flag.clone()),
            _ => self.command.clone(),
        }
    }
}

#[async_trait]
impl PackageBuilder for CommandBuilder {
    async fn build(&self, mode: BuildMode) -> Result<PackageRegistry, StageError> {
        let output = self.command_for(mode).run_captured().await?;
        tracing::debug!(stdout = %output.stdout, "build command finished");

        let source = self.source.clone();
        let registry = tokio::task::spawn_blocking(move || source.load())
            .await
            .map_err(|e| StageError::Registry {
                message: format!("registry loader did not complete: {e}"),
            })??;

        if registry.is_empty() {
            tracing::warn!("build registry is empty; the project will use published packages");
        }
        for (package, locator) in registry.iter() {
            tracing::debug!(%package, %locator, "built package");
        }
        Ok(registry)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;

    use pipeline::ExitStatusCode;

    use super::*;

    #[test]
    fn local_flag_only_applies_to_local_builds() {
        let builder = CommandBuilder::new(
            ProcessCommand::new("npm").args(["run", "build", "--"]),
            Some("--local".into()),
            RegistrySource::File("registry.json".into()),
        );

        assert_eq!(builder.command_for(BuildMode::Local).args, ["run", "build", "--", "--local"]);
        assert_eq!(builder.command_for(BuildMode::Release).args, ["run", "build", "--"]);
    }

    #[tokio::test]
    async fn successful_build_loads_registry_written_by_the_command() {
        let temp = tempfile::tempdir().unwrap();
        let registry_path = temp.path().join("registry.json");
        let script = format!(
            r#"[ "$1" = "--local" ] || exit 9; echo '{{"pkg-a": "/dist/pkg-a.tgz"}}' > '{}'"#,
            registry_path.display()
        );
        let builder = CommandBuilder::new(
            ProcessCommand::new("sh").args(["-c", script.as_str(), "build"]),
            Some("--local".into()),
            RegistrySource::File(registry_path),
        );

        let registry = builder.build(BuildMode::Local).await.unwrap();

        let entries: Vec<_> = registry
            .iter()
            .map(|(n, l)| (n.as_str(), l.as_str()))
            .collect();
        assert_eq!(entries, [("pkg-a", "/dist/pkg-a.tgz")]);
    }

    #[tokio::test]
    async fn failed_build_never_reads_the_registry() {
        let temp = tempfile::tempdir().unwrap();
        let registry_path = temp.path().join("registry.json");
        fs::write(&registry_path, "{}").unwrap();
        let builder = CommandBuilder::new(
            ProcessCommand::new("sh").args(["-c", "echo 'compile error' >&2; exit 2"]),
            None,
            RegistrySource::File(registry_path),
        );

        let err = builder.build(BuildMode::Local).await.unwrap_err();

        assert!(matches!(
            err,
            StageError::CommandFailed {
                status: ExitStatusCode::Code(2),
                ..
            }
        ));
    }
}
