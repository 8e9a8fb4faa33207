//! Where the build registry comes from.
//!
//! Either the build writes a `{ "<package>": "<locator>" }` JSON file, or the
//! registry is derived from the workspace: every publishable `package.json`
//! under the packages directory maps to `<dist>/<tarball stem>.tgz`.

use std::path::{Path, PathBuf};

use pipeline::{ArtifactLocator, PackageName, PackageRegistry, StageError};
use serde::Deserialize;
use walkdir::WalkDir;

/// How to assemble the [`PackageRegistry`] after a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    /// A JSON object mapping package name to artifact locator.
    File(PathBuf),
    /// Scan `packages_dir` for package manifests; artifacts live in `dist_dir`.
    Workspace {
        packages_dir: PathBuf,
        dist_dir: PathBuf,
    },
}

/// The fields of a workspace package manifest that matter here.
#[derive(Debug, Deserialize)]
struct WorkspacePackage {
    name: Option<String>,
    #[serde(default)]
    private: bool,
}

impl RegistrySource {
    /// Reads the registry. Blocking; call from a blocking-capable context.
    pub fn load(&self) -> Result<PackageRegistry, StageError> {
        match self {
            Self::File(path) => load_file(path),
            Self::Workspace {
                packages_dir,
                dist_dir,
            } => scan_workspace(packages_dir, dist_dir),
        }
    }
}

fn load_file(path: &Path) -> Result<PackageRegistry, StageError> {
    let text = std::fs::read_to_string(path).map_err(|source| StageError::RegistryIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| StageError::Registry {
        message: format!("{}: {e}", path.display()),
    })
}

fn scan_workspace(packages_dir: &Path, dist_dir: &Path) -> Result<PackageRegistry, StageError> {
    let dist_dir = std::path::absolute(dist_dir).map_err(|source| StageError::RegistryIo {
        path: dist_dir.to_path_buf(),
        source,
    })?;

    let mut registry = PackageRegistry::new();
    let entries = WalkDir::new(packages_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules");
    for entry in entries {
        let entry = entry.map_err(|e| StageError::RegistryIo {
            path: e.path().map_or_else(|| packages_dir.to_path_buf(), Path::to_path_buf),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || entry.file_name() != "package.json" {
            continue;
        }

        let path = entry.path();
        let text = std::fs::read_to_string(path).map_err(|source| StageError::RegistryIo {
            path: path.to_path_buf(),
            source,
        })?;
        let package: WorkspacePackage =
            serde_json::from_str(&text).map_err(|e| StageError::Registry {
                message: format!("{}: {e}", path.display()),
            })?;
        if package.private {
            continue;
        }
        let Some(name) = package.name.and_then(PackageName::new) else {
            tracing::debug!(manifest = %path.display(), "skipping package without a name");
            continue;
        };

        let tarball = dist_dir.join(format!("{}.tgz", name.tarball_stem()));
        if !tarball.is_file() {
            tracing::warn!(package = %name, tarball = %tarball.display(), "build produced no tarball");
        }
        let locator = ArtifactLocator::new(tarball.to_string_lossy()).ok_or_else(|| {
            StageError::Registry {
                message: format!("empty artifact path for {name}"),
            }
        })?;
        registry.insert(name, locator);
    }

    Ok(registry)
}
