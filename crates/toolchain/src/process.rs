//! Running external commands.
//!
//! Every adapter in this crate goes through [`ProcessCommand`]. Commands run
//! to completion before control returns; there are no timeouts and nothing is
//! left running in the background.

use std::path::PathBuf;
use std::process::Stdio;

use pipeline::{CommandOutput, ExitStatusCode, StageError};
use tokio::process::Command;

/// A program, its arguments, and the directory to run it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    /// `None` inherits the current process working directory.
    pub cwd: Option<PathBuf>,
}

impl ProcessCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// `program "arg1", "arg2"`, the form used in failure logs.
    pub fn display_line(&self) -> String {
        let quoted: Vec<String> = self
            .args
            .iter()
            .map(|a| serde_json::to_string(a).unwrap_or_else(|_| format!("{a:?}")))
            .collect();
        format!("{} {}", self.program, quoted.join(", "))
    }

    fn to_tokio(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }

    /// Runs the command with stdout and stderr captured as UTF-8 (lossy).
    ///
    /// A nonzero exit is logged (command line, then stderr) and returned as
    /// [`StageError::CommandFailed`].
    pub async fn run_captured(&self) -> Result<CommandOutput, StageError> {
        tracing::debug!(command = %self.display_line(), "running");
        let output = match self.to_tokio().output().await {
            Ok(output) => output,
            Err(source) => {
                for line in failure_report(self, Some(&source), "") {
                    tracing::error!("{line}");
                }
                return Err(StageError::Spawn {
                    program: self.program.clone(),
                    source,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let status = ExitStatusCode::from(output.status.code());
        if !status.is_success() {
            for line in failure_report(self, None, &stderr) {
                tracing::error!("{line}");
            }
            return Err(StageError::CommandFailed {
                program: self.program.clone(),
                args: self.args.clone(),
                status,
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }

    /// Runs the command with stdio inherited, so its output goes straight to
    /// the terminal. Returns how it exited; a nonzero exit is not an error
    /// here.
    pub async fn run_inherited(&self) -> Result<ExitStatusCode, StageError> {
        tracing::debug!(command = %self.display_line(), "running");
        let mut cmd = self.to_tokio();
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        let status = cmd
            .status()
            .await
            .map_err(|source| StageError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        Ok(ExitStatusCode::from(status.code()))
    }
}

/// Lines logged when a command fails: the command line, then the process
/// error if there is one, otherwise the captured stderr.
pub fn failure_report(
    command: &ProcessCommand,
    error: Option<&std::io::Error>,
    stderr: &str,
) -> Vec<String> {
    let detail = match error {
        Some(error) => format!("Error: {error}"),
        None => format!("STDERR:\n{stderr}"),
    };
    vec![format!("Command failed: {}", command.display_line()), detail]
}
