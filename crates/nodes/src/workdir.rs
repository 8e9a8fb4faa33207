//! Scoped change of the process working directory.

use std::env;
use std::path::{Path, PathBuf};

use pipeline::CreateError;

/// Changes the process working directory and changes it back on drop.
///
/// The working directory is process-wide state with no locking; two guards
/// alive on different threads at the same time will race.
#[derive(Debug)]
#[must_use = "the previous directory is restored as soon as the guard is dropped"]
pub struct WorkingDirGuard {
    original: PathBuf,
}

impl WorkingDirGuard {
    /// Records the current directory, then enters `path`.
    pub fn enter(path: &Path) -> Result<Self, CreateError> {
        let original = env::current_dir().map_err(|source| CreateError::WorkingDirectory {
            path: PathBuf::from("."),
            source,
        })?;
        env::set_current_dir(path).map_err(|source| CreateError::WorkingDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(from = %original.display(), to = %path.display(), "entered working directory");
        Ok(Self { original })
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        match env::set_current_dir(&self.original) {
            Ok(()) => tracing::debug!(to = %self.original.display(), "restored working directory"),
            Err(error) => tracing::warn!(
                to = %self.original.display(),
                %error,
                "could not restore working directory"
            ),
        }
    }
}
