//! Project generator adapter (`ng new` and compatible CLIs).

use std::path::Path;

use async_trait::async_trait;
use pipeline::{ProjectGenerator, ProjectName, StageError};

use crate::process::ProcessCommand;

/// Flags that keep the generator from installing, committing, or prompting.
pub const NON_INTERACTIVE_FLAGS: [&str; 3] = ["--skip-install", "--skip-git", "--no-interactive"];

/// [`ProjectGenerator`] that shells out to `<program> [args..] new <name> <flags..>`.
#[derive(Debug, Clone)]
pub struct CliGenerator {
    program: String,
    /// Arguments placed before `new`, e.g. `["@angular/cli"]` for `npx`.
    args: Vec<String>,
    /// Arguments appended after the non-interactive flags.
    extra_args: Vec<String>,
}

impl CliGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>, extra_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            extra_args,
        }
    }

    fn command(&self, name: &ProjectName, parent: &Path) -> ProcessCommand {
        ProcessCommand::new(self.program.clone())
            .args(self.args.iter().cloned())
            .args(["new", name.as_str()])
            .args(NON_INTERACTIVE_FLAGS)
            .args(self.extra_args.iter().cloned())
            .current_dir(parent)
    }
}

#[async_trait]
impl ProjectGenerator for CliGenerator {
    async fn generate(&self, name: &ProjectName, parent: &Path) -> Result<(), StageError> {
        let status = self.command(name, parent).run_inherited().await?;
        if !status.is_success() {
            return Err(StageError::GeneratorFailed { status });
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use pipeline::ExitStatusCode;
    use pretty_assertions::assert_eq;

    use super::*;

    fn name(n: &str) -> ProjectName {
        ProjectName::new(n).unwrap()
    }

    #[test]
    fn builds_the_generator_command_line() {
        let generator = CliGenerator::new(
            "npx",
            vec!["@angular/cli".into()],
            vec!["--style=scss".into()],
        );

        let cmd = generator.command(&name("demo"), Path::new("/work"));

        assert_eq!(cmd.program, "npx");
        assert_eq!(
            cmd.args,
            [
                "@angular/cli",
                "new",
                "demo",
                "--skip-install",
                "--skip-git",
                "--no-interactive",
                "--style=scss"
            ]
        );
        assert_eq!(cmd.cwd.as_deref(), Some(Path::new("/work")));
    }

    #[tokio::test]
    async fn creates_project_directory_in_parent() {
        let temp = tempfile::tempdir().unwrap();
        // $0 is "ng"; $1 is "new"; $2 is the project name.
        let script = r#"[ "$1" = "new" ] && mkdir "$2" && echo '{}' > "$2/package.json""#;
        let generator = CliGenerator::new("sh", vec!["-c".into(), script.into(), "ng".into()], vec![]);

        generator.generate(&name("demo"), temp.path()).await.unwrap();

        assert!(temp.path().join("demo/package.json").is_file());
    }

    #[tokio::test]
    async fn nonzero_exit_is_reported_with_its_code() {
        let temp = tempfile::tempdir().unwrap();
        let generator = CliGenerator::new("sh", vec!["-c".into(), "exit 1".into()], vec![]);

        let err = generator.generate(&name("demo"), temp.path()).await.unwrap_err();

        assert!(matches!(
            err,
            StageError::GeneratorFailed {
                status: ExitStatusCode::Code(1)
            }
        ));
        assert!(err.to_string().contains("Error code: 1"));
    }
}
