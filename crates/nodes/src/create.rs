//! The `create-sample` stage sequencer.
//!
//! Stages run strictly in order and the first failure aborts the run:
//!
//! 1. **build**: build local packages, yielding the [`PackageRegistry`].
//! 2. **generate**: scaffold `<cwd>/<name>` with the project generator.
//! 3. **patch**: point `<cwd>/<name>/package.json` at the local artifacts.
//! 4. **install**: install the project's dependencies.
//!
//! Each stage runs inside its own span, nested under a `create_project` span
//! that carries the run id and project name. Nothing is cleaned up on
//! failure; a half-created project stays on disk for inspection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pipeline::{
    BuildMode, CreateError, DependencyInstaller, PackageBuilder, ProjectGenerator, ProjectName,
    RunId,
};
use tracing::{info, info_span, Instrument};

use crate::manifest_file::{patch_manifest_file, MANIFEST_FILE};
use crate::workdir::WorkingDirGuard;

/// Input of one run.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    /// Positional arguments; the first one names the project.
    pub args: Vec<String>,
    /// Directory under which the project is created.
    pub cwd: PathBuf,
}

impl CreateRequest {
    /// Validates the first positional argument as a project name.
    pub fn project_name(&self) -> Result<ProjectName, CreateError> {
        let raw = self.args.first().ok_or_else(|| CreateError::InvalidArguments {
            message: "missing project name".to_string(),
        })?;
        ProjectName::new(raw.as_str()).ok_or_else(|| CreateError::InvalidArguments {
            message: format!("'{raw}' is not a valid project name"),
        })
    }
}

/// Runs the build → generate → patch → install sequence.
pub struct CreateProject {
    builder: Arc<dyn PackageBuilder>,
    generator: Arc<dyn ProjectGenerator>,
    installer: Arc<dyn DependencyInstaller>,
}

impl CreateProject {
    pub fn new(
        builder: Arc<dyn PackageBuilder>,
        generator: Arc<dyn ProjectGenerator>,
        installer: Arc<dyn DependencyInstaller>,
    ) -> Self {
        Self {
            builder,
            generator,
            installer,
        }
    }

    /// Runs every stage and returns exit code `0` on success.
    ///
    /// Failures are returned as errors, never as a nonzero code. The process
    /// working directory is changed for the duration of the run and restored
    /// on every exit path.
    pub async fn run(&self, request: &CreateRequest) -> Result<i32, CreateError> {
        let name = request.project_name()?;
        let run_id = RunId::new_random();
        let span = info_span!("create_project", %run_id, project = %name);
        self.run_stages(&name, &request.cwd).instrument(span).await
    }

    async fn run_stages(&self, name: &ProjectName, cwd: &Path) -> Result<i32, CreateError> {
        // Resolve before any chdir so a relative cwd keeps its meaning.
        let cwd = std::path::absolute(cwd).map_err(|source| CreateError::WorkingDirectory {
            path: cwd.to_path_buf(),
            source,
        })?;

        info!("Building...");
        let registry = self
            .builder
            .build(BuildMode::Local)
            .instrument(info_span!("build"))
            .await
            .map_err(CreateError::Build)?;
        info!(packages = registry.len(), "build finished");

        let _cwd_guard = WorkingDirGuard::enter(&cwd)?;

        info!("Creating project...");
        self.generator
            .generate(name, &cwd)
            .instrument(info_span!("generate"))
            .await
            .map_err(CreateError::Generate)?;

        info!("Updating package.json...");
        let project_dir = cwd.join(name.as_str());
        let report = patch_manifest_file(&project_dir.join(MANIFEST_FILE), &registry)
            .instrument(info_span!("patch"))
            .await?;
        info!(
            patched = report.patched.len(),
            unreferenced = report.unreferenced.len(),
            "manifest updated"
        );

        info!("Installing npm packages...");
        let output = self
            .installer
            .install(&project_dir)
            .instrument(info_span!("install"))
            .await
            .map_err(CreateError::Install)?;
        tracing::debug!(stdout = %output.stdout, "install finished");

        info!(project = %project_dir.display(), "sample project ready");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pipeline::{
        ArtifactLocator, CommandOutput, ExitStatusCode, PackageName, PackageRegistry, StageError,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use serial_test::serial;

    use super::*;

    type Calls = Arc<Mutex<Vec<String>>>;

    struct FakeBuilder {
        calls: Calls,
        fail: bool,
    }

    #[async_trait]
    impl PackageBuilder for FakeBuilder {
        async fn build(&self, mode: BuildMode) -> Result<PackageRegistry, StageError> {
            self.calls.lock().unwrap().push(format!("build:{mode:?}"));
            if self.fail {
                return Err(StageError::CommandFailed {
                    program: "npm".into(),
                    args: vec!["run".into(), "build".into()],
                    status: ExitStatusCode::Code(2),
                    stderr: "tsc failed".into(),
                });
            }
            Ok([("pkg-a", "file:./pkg-a.tgz"), ("pkg-dev", "/dist/pkg-dev.tgz")]
                .into_iter()
                .map(|(n, l)| {
                    (
                        PackageName::new(n).unwrap(),
                        ArtifactLocator::new(l).unwrap(),
                    )
                })
                .collect())
        }
    }

    struct FakeGenerator {
        calls: Calls,
        exit_code: i32,
        manifest: &'static str,
    }

    #[async_trait]
    impl ProjectGenerator for FakeGenerator {
        async fn generate(&self, name: &ProjectName, parent: &Path) -> Result<(), StageError> {
            let current = env::current_dir().unwrap().canonicalize().unwrap();
            assert_eq!(current, parent.canonicalize().unwrap());
            self.calls.lock().unwrap().push(format!("generate:{name}"));
            if self.exit_code != 0 {
                return Err(StageError::GeneratorFailed {
                    status: ExitStatusCode::Code(self.exit_code),
                });
            }
            let dir = parent.join(name.as_str());
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(MANIFEST_FILE), self.manifest).unwrap();
            Ok(())
        }
    }

    struct FakeInstaller {
        calls: Calls,
        fail: bool,
    }

    #[async_trait]
    impl DependencyInstaller for FakeInstaller {
        async fn install(&self, project_dir: &Path) -> Result<CommandOutput, StageError> {
            let dir = project_dir.file_name().unwrap().to_string_lossy().into_owned();
            self.calls.lock().unwrap().push(format!("install:{dir}"));
            if self.fail {
                return Err(StageError::CommandFailed {
                    program: "npm".into(),
                    args: vec!["install".into()],
                    status: ExitStatusCode::Code(1),
                    stderr: "ERESOLVE".into(),
                });
            }
            Ok(CommandOutput {
                stdout: "added 3 packages".into(),
                stderr: String::new(),
            })
        }
    }

    struct Harness {
        calls: Calls,
        create: CreateProject,
    }

    fn harness(build_fails: bool, generator_exit: i32, install_fails: bool) -> Harness {
        let calls: Calls = Arc::default();
        let create = CreateProject::new(
            Arc::new(FakeBuilder {
                calls: calls.clone(),
                fail: build_fails,
            }),
            Arc::new(FakeGenerator {
                calls: calls.clone(),
                exit_code: generator_exit,
                manifest: r#"{"name":"demo","dependencies":{"pkg-a":"^1.0.0","rxjs":"~7.8.0"},"devDependencies":{"pkg-dev":"^1.0.0"}}"#,
            }),
            Arc::new(FakeInstaller {
                calls: calls.clone(),
                fail: install_fails,
            }),
        );
        Harness { calls, create }
    }

    fn request(cwd: &Path, args: &[&str]) -> CreateRequest {
        CreateRequest {
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        }
    }

    fn calls(h: &Harness) -> Vec<String> {
        h.calls.lock().unwrap().clone()
    }

    #[tokio::test]
    #[serial]
    async fn runs_all_stages_and_patches_manifest() {
        let before = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let h = harness(false, 0, false);

        let code = h.create.run(&request(temp.path(), &["demo"])).await.unwrap();

        assert_eq!(code, 0);
        assert_eq!(calls(&h), ["build:Local", "generate:demo", "install:demo"]);
        let written: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(temp.path().join("demo").join(MANIFEST_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(
            written,
            json!({
                "name": "demo",
                "dependencies": {"pkg-a": "file:./pkg-a.tgz", "rxjs": "~7.8.0"},
                "devDependencies": {"pkg-dev": "/dist/pkg-dev.tgz"}
            })
        );
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[tokio::test]
    #[serial]
    async fn generator_failure_stops_before_patch_and_install() {
        let before = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let h = harness(false, 1, false);

        let err = h.create.run(&request(temp.path(), &["demo"])).await.unwrap_err();

        assert!(matches!(err, CreateError::Generate(_)));
        let message = err.to_string();
        assert!(message.contains("Error code: 1"), "{message}");
        assert_eq!(calls(&h), ["build:Local", "generate:demo"]);
        assert!(!temp.path().join("demo").exists());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[tokio::test]
    #[serial]
    async fn build_failure_aborts_before_anything_else() {
        let before = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let h = harness(true, 0, false);

        let err = h.create.run(&request(temp.path(), &["demo"])).await.unwrap_err();

        assert!(matches!(err, CreateError::Build(_)));
        assert_eq!(calls(&h), ["build:Local"]);
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[tokio::test]
    #[serial]
    async fn install_failure_is_returned_and_directory_restored() {
        let before = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let h = harness(false, 0, true);

        let err = h.create.run(&request(temp.path(), &["demo"])).await.unwrap_err();

        assert!(matches!(
            err,
            CreateError::Install(StageError::CommandFailed { ref stderr, .. }) if stderr == "ERESOLVE"
        ));
        assert_eq!(calls(&h), ["build:Local", "generate:demo", "install:demo"]);
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[tokio::test]
    #[serial]
    async fn missing_or_invalid_project_name_runs_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let h = harness(false, 0, false);

        let missing = h.create.run(&request(temp.path(), &[])).await.unwrap_err();
        let invalid = h.create.run(&request(temp.path(), &["../escape"])).await.unwrap_err();

        assert!(matches!(missing, CreateError::InvalidArguments { .. }));
        assert!(matches!(invalid, CreateError::InvalidArguments { .. }));
        assert!(calls(&h).is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn nonexistent_cwd_fails_after_build_without_generating() {
        let before = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let h = harness(false, 0, false);

        let err = h
            .create
            .run(&request(&temp.path().join("nope"), &["demo"]))
            .await
            .unwrap_err();

        assert!(matches!(err, CreateError::WorkingDirectory { .. }));
        assert_eq!(calls(&h), ["build:Local"]);
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
