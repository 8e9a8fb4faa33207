//! `.create-sample.toml` loading and validation.
//!
//! Every field is optional; an absent file yields the defaults, which drive
//! `npm run build -- --local`, `ng new`, and `npm install`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use toolchain::{CliGenerator, CommandBuilder, PackageManagerInstaller, ProcessCommand, RegistrySource};

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".create-sample.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("'{field}' must not be empty")]
    EmptyProgram { field: &'static str },

    #[error("'registry.file' and 'registry.packages_dir' are mutually exclusive")]
    ConflictingRegistrySource,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub build: BuildConfig,
    pub registry: RegistryConfig,
    pub generator: GeneratorConfig,
    pub installer: InstallerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Appended for local builds. Empty string disables it.
    pub local_flag: String,
    /// Directory the build runs in; registry paths are relative to it.
    pub workspace_root: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
            args: vec!["run".to_string(), "build".to_string(), "--".to_string()],
            local_flag: "--local".to_string(),
            workspace_root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub file: Option<PathBuf>,
    pub packages_dir: Option<PathBuf>,
    pub dist_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub program: String,
    pub args: Vec<String>,
    pub extra_args: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "ng".to_string(),
            args: Vec::new(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
            args: vec!["install".to_string()],
        }
    }
}

impl Config {
    /// Loads `path`. A missing file is an error only when `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(config = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, program) in [
            ("build.program", &self.build.program),
            ("generator.program", &self.generator.program),
            ("installer.program", &self.installer.program),
        ] {
            if program.trim().is_empty() {
                return Err(ConfigError::EmptyProgram { field });
            }
        }
        if self.registry.file.is_some() && self.registry.packages_dir.is_some() {
            return Err(ConfigError::ConflictingRegistrySource);
        }
        Ok(())
    }

    /// Registry source with paths resolved against `workspace_root`.
    pub fn registry_source(&self, workspace_root: &Path) -> RegistrySource {
        match &self.registry.file {
            Some(file) => RegistrySource::File(workspace_root.join(file)),
            None => RegistrySource::Workspace {
                packages_dir: workspace_root.join(
                    self.registry
                        .packages_dir
                        .as_deref()
                        .unwrap_or(Path::new("packages")),
                ),
                dist_dir: workspace_root
                    .join(self.registry.dist_dir.as_deref().unwrap_or(Path::new("dist"))),
            },
        }
    }

    /// `workspace_root` must already be absolute; the run changes directory.
    pub fn builder(&self, workspace_root: &Path, source: RegistrySource) -> CommandBuilder {
        let command = ProcessCommand::new(self.build.program.clone())
            .args(self.build.args.iter().cloned())
            .current_dir(workspace_root);
        let local_flag = Some(self.build.local_flag.clone()).filter(|f| !f.is_empty());
        CommandBuilder::new(command, local_flag, source)
    }

    pub fn generator(&self) -> CliGenerator {
        CliGenerator::new(
            self.generator.program.clone(),
            self.generator.args.clone(),
            self.generator.extra_args.clone(),
        )
    }

    pub fn installer(&self) -> PackageManagerInstaller {
        PackageManagerInstaller::new(self.installer.program.clone(), self.installer.args.clone())
    }
}
