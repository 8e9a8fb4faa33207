//! Error types for the create-sample domain.
//!
//! [`CreateError`] is what the pipeline as a whole fails with. It wraps a
//! [`StageError`] for failures reported by an external collaborator (build,
//! generator, installer) and a [`ManifestError`] for failures patching
//! `package.json`. None of these are retried: the first error aborts the run.

use std::path::PathBuf;

use thiserror::Error;

use crate::ExitStatusCode;

// ---------------------------------------------------------------------------
// Manifest errors
// ---------------------------------------------------------------------------

/// The manifest could not be parsed, shaped, or serialised.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("manifest top-level value is not a JSON object")]
    NotAnObject,

    /// `dependencies` or `devDependencies` exists but is not an object.
    #[error("manifest field '{section}' is not a JSON object")]
    SectionNotAnObject { section: &'static str },

    #[error("manifest could not be serialised: {0}")]
    Serialize(#[source] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Stage errors
// ---------------------------------------------------------------------------

/// Failure reported by one of the external collaborators.
#[derive(Debug, Error)]
pub enum StageError {
    /// The process could not be started at all.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error("command '{program}' exited with status {status}{}", stderr_suffix(.stderr))]
    CommandFailed {
        program: String,
        args: Vec<String>,
        status: ExitStatusCode,
        stderr: String,
    },

    /// The project generator exited unsuccessfully. Its output was not
    /// captured; the user has already seen it on the terminal.
    #[error("Could not call the project generator. See above for more details. Error code: {status}")]
    GeneratorFailed { status: ExitStatusCode },

    /// The build succeeded but its registry could not be assembled.
    #[error("package registry is invalid: {message}")]
    Registry { message: String },

    #[error("failed to read package registry input '{}': {source}", .path.display())]
    RegistryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// Errors that abort a `create-sample` run.
///
/// The stage variants say *where* the run stopped; the wrapped error says why.
/// Its text is part of the message, so `{:#}` chains do not repeat it.
#[derive(Debug, Error)]
pub enum CreateError {
    /// The positional arguments did not name a usable project.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("build stage failed: {0}")]
    Build(StageError),

    #[error("project generation failed: {0}")]
    Generate(StageError),

    #[error("dependency installation failed: {0}")]
    Install(StageError),

    /// The process working directory could not be changed.
    #[error("cannot enter working directory '{}'", .path.display())]
    WorkingDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read or write manifest '{}'", .path.display())]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot patch manifest '{}'", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_failure_message_carries_the_exit_code() {
        let err = StageError::GeneratorFailed {
            status: ExitStatusCode::Code(1),
        };
        assert!(err.to_string().ends_with("Error code: 1"));
    }

    #[test]
    fn command_failure_message_includes_trimmed_stderr() {
        let err = StageError::CommandFailed {
            program: "npm".into(),
            args: vec!["install".into()],
            status: ExitStatusCode::Code(254),
            stderr: "npm ERR! missing script\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "command 'npm' exited with status 254: npm ERR! missing script"
        );

        let quiet = StageError::CommandFailed {
            program: "npm".into(),
            args: vec![],
            status: ExitStatusCode::Signal,
            stderr: "  \n".into(),
        };
        assert_eq!(quiet.to_string(), "command 'npm' exited with status signal");
    }

    #[test]
    fn stage_failures_name_the_stage_and_the_cause() {
        let err = CreateError::Generate(StageError::GeneratorFailed {
            status: ExitStatusCode::Code(1),
        });
        assert_eq!(
            err.to_string(),
            "project generation failed: Could not call the project generator. \
             See above for more details. Error code: 1"
        );
        assert!(std::error::Error::source(&err).is_none());
    }
}
