//! Reading and rewriting `package.json` on disk.

use std::path::Path;

use pipeline::{CreateError, PackageManifest, PackageRegistry, PatchReport};

/// File name of the manifest inside a generated project.
pub const MANIFEST_FILE: &str = "package.json";

/// Points the manifest at `path` to the artifacts in `registry` and writes it
/// back in place, 2-space indented. No backup is kept.
pub async fn patch_manifest_file(
    path: &Path,
    registry: &PackageRegistry,
) -> Result<PatchReport, CreateError> {
    let io_err = |source| CreateError::ManifestIo {
        path: path.to_path_buf(),
        source,
    };
    let manifest_err = |source| CreateError::Manifest {
        path: path.to_path_buf(),
        source,
    };

    let text = tokio::fs::read_to_string(path).await.map_err(io_err)?;
    let mut manifest = PackageManifest::parse(&text).map_err(manifest_err)?;
    let report = manifest.apply_registry(registry).map_err(manifest_err)?;
    let patched = manifest.to_pretty_string().map_err(manifest_err)?;
    tokio::fs::write(path, patched).await.map_err(io_err)?;

    for entry in &report.patched {
        tracing::debug!(
            package = %entry.package,
            section = %entry.section,
            previous = %entry.previous,
            "pointed dependency at local build"
        );
    }
    for package in &report.unreferenced {
        tracing::debug!(%package, "package not referenced by the project");
    }

    Ok(report)
}
