//! `package.json` patching.
//!
//! The manifest is handled as a generic JSON object so that every field the
//! generator wrote survives the round trip untouched, in its original order.
//! Only the version specifiers of packages that already appear in
//! `dependencies` or `devDependencies` are ever rewritten.

use serde_json::{Map, Value};

use crate::{ManifestError, PackageName, PackageRegistry};

const DEPENDENCIES: &str = "dependencies";
const DEV_DEPENDENCIES: &str = "devDependencies";

/// Lookup order when patching: runtime dependencies win.
const SECTIONS: [DependencySection; 2] = [
    DependencySection::Dependencies,
    DependencySection::DevDependencies,
];

/// Which dependency section of the manifest an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencySection {
    Dependencies,
    DevDependencies,
}

impl DependencySection {
    /// JSON field name of the section.
    pub fn field(self) -> &'static str {
        match self {
            Self::Dependencies => DEPENDENCIES,
            Self::DevDependencies => DEV_DEPENDENCIES,
        }
    }
}

impl std::fmt::Display for DependencySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}

/// One specifier rewritten by [`PackageManifest::apply_registry`].
#[derive(Debug, Clone, PartialEq)]
pub struct PatchedEntry {
    pub package: PackageName,
    pub section: DependencySection,
    /// The value that was replaced. Usually a version range string, but kept
    /// as raw JSON since the manifest is not validated beyond its shape.
    pub previous: Value,
}

/// What [`PackageManifest::apply_registry`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchReport {
    pub patched: Vec<PatchedEntry>,
    /// Registry packages the manifest does not depend on.
    pub unreferenced: Vec<PackageName>,
}

/// A parsed `package.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest(Map<String, Value>);

impl PackageManifest {
    /// Parses manifest text. The top-level value must be a JSON object.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        match serde_json::from_str(text).map_err(ManifestError::Parse)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ManifestError::NotAnObject),
        }
    }

    /// Inserts empty `dependencies` and `devDependencies` objects where the
    /// field is missing or `null`.
    ///
    /// Any other non-object value is an error rather than being replaced.
    pub fn ensure_dependency_sections(&mut self) -> Result<(), ManifestError> {
        for section in SECTIONS {
            let entry = self.0.entry(section.field()).or_insert(Value::Null);
            if entry.is_null() {
                *entry = Value::Object(Map::new());
            }
            if !entry.is_object() {
                return Err(ManifestError::SectionNotAnObject {
                    section: section.field(),
                });
            }
        }
        Ok(())
    }

    /// Points every dependency that the registry knows about at its local
    /// artifact.
    ///
    /// `dependencies` is consulted first; a package is only rewritten in
    /// `devDependencies` when it is not a runtime dependency. Keys are never
    /// added or removed.
    pub fn apply_registry(
        &mut self,
        registry: &PackageRegistry,
    ) -> Result<PatchReport, ManifestError> {
        self.ensure_dependency_sections()?;

        let mut report = PatchReport::default();
        for (package, locator) in registry.iter() {
            let mut entry = None;
            for section in SECTIONS {
                if let Some(slot) = self.section_mut(section)?.get_mut(package.as_str()) {
                    let previous =
                        std::mem::replace(slot, Value::String(locator.as_str().to_owned()));
                    entry = Some(PatchedEntry {
                        package: package.clone(),
                        section,
                        previous,
                    });
                    break;
                }
            }

            match entry {
                Some(entry) => report.patched.push(entry),
                None => report.unreferenced.push(package.clone()),
            }
        }
        Ok(report)
    }

    #[cfg(test)]
    fn specifier(&self, section: DependencySection, package: &str) -> Option<&Value> {
        self.0
            .get(section.field())
            .and_then(Value::as_object)
            .and_then(|deps| deps.get(package))
    }

    /// Serialises with 2-space indentation, matching what npm itself writes.
    pub fn to_pretty_string(&self) -> Result<String, ManifestError> {
        serde_json::to_string_pretty(&self.0).map_err(ManifestError::Serialize)
    }

    #[cfg(test)]
    fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    fn section_mut(
        &mut self,
        section: DependencySection,
    ) -> Result<&mut Map<String, Value>, ManifestError> {
        self.0
            .get_mut(section.field())
            .and_then(Value::as_object_mut)
            .ok_or(ManifestError::SectionNotAnObject {
                section: section.field(),
            })
    }
}
