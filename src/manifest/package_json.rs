//! package.json and override-file model
//!
//! Dependency sections are typed; every other field is kept as an opaque
//! JSON value so a rewritten file differs from the original only in the
//! dependency values that changed. Key order is preserved.

use crate::domain::DependencyKind;
use crate::error::{ConfigError, ManifestError};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Dependency name → declared specifier, in declaration order
pub type DependencyMap = IndexMap<String, String>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestFields {
    name: Option<String>,
    dependencies: Option<DependencyMap>,
    dev_dependencies: Option<DependencyMap>,
    peer_dependencies: Option<DependencyMap>,
    package_manager: Option<String>,
}

/// A workspace package manifest or override file
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    /// Package name
    pub name: Option<String>,
    /// `packageManager` field (`pnpm@9.1.0`)
    pub package_manager: Option<String>,
    dependencies: Option<DependencyMap>,
    dev_dependencies: Option<DependencyMap>,
    peer_dependencies: Option<DependencyMap>,
    document: Map<String, Value>,
}

impl PackageManifest {
    /// Parses manifest JSON; `path` is only used for error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let document: Map<String, Value> = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;
        let fields: ManifestFields = serde_json::from_value(Value::Object(document.clone()))
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

        Ok(Self {
            name: fields.name,
            package_manager: fields.package_manager,
            dependencies: fields.dependencies,
            dev_dependencies: fields.dev_dependencies,
            peer_dependencies: fields.peer_dependencies,
            document,
        })
    }

    /// Reads and parses a manifest file
    pub async fn read(path: &Path) -> Result<Self, ManifestError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::not_found(path)
            } else {
                ManifestError::read_error(path, e)
            }
        })?;
        Self::parse(&content, path)
    }

    /// Returns a dependency section
    pub fn section(&self, kind: DependencyKind) -> Option<&DependencyMap> {
        match kind {
            DependencyKind::Runtime => self.dependencies.as_ref(),
            DependencyKind::Development => self.dev_dependencies.as_ref(),
            DependencyKind::Peer => self.peer_dependencies.as_ref(),
        }
    }

    /// Returns a mutable dependency section
    pub fn section_mut(&mut self, kind: DependencyKind) -> Option<&mut DependencyMap> {
        match kind {
            DependencyKind::Runtime => self.dependencies.as_mut(),
            DependencyKind::Development => self.dev_dependencies.as_mut(),
            DependencyKind::Peer => self.peer_dependencies.as_mut(),
        }
    }

    /// Sets the declared specifier of an existing dependency
    ///
    /// Returns false if the dependency is not declared in that section.
    pub fn set_version(&mut self, kind: DependencyKind, name: &str, specifier: &str) -> bool {
        match self.section_mut(kind).and_then(|deps| deps.get_mut(name)) {
            Some(value) => {
                *value = specifier.to_string();
                true
            }
            None => false,
        }
    }

    /// Returns a raw top-level field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// Reads `pnpm.overrides` as the lock table source
    pub fn pnpm_overrides(&self, path: &Path) -> Result<DependencyMap, ConfigError> {
        let Some(overrides) = self.field("pnpm").and_then(|pnpm| pnpm.get("overrides")) else {
            return Ok(DependencyMap::new());
        };

        let object = overrides.as_object().ok_or_else(|| {
            ConfigError::invalid_field(path, "pnpm.overrides", "expected an object")
        })?;

        object
            .iter()
            .map(|(name, value)| match value.as_str() {
                Some(version) => Ok((name.clone(), version.to_string())),
                None => Err(ConfigError::invalid_field(
                    path,
                    format!("pnpm.overrides.{}", name),
                    "expected a string",
                )),
            })
            .collect()
    }

    /// Version of the pinned package manager (`pnpm@9.1.0+sha512...` → `9.1.0`)
    pub fn package_manager_version(&self) -> Option<&str> {
        let spec = self.package_manager.as_deref()?;
        let (_, version) = spec.rsplit_once('@')?;
        Some(version.split('+').next().unwrap_or(version))
    }

    /// Serializes with 4-space indentation and a trailing newline
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut document = self.document.clone();
        for kind in [
            DependencyKind::Runtime,
            DependencyKind::Development,
            DependencyKind::Peer,
        ] {
            if let Some(deps) = self.section(kind) {
                document.insert(kind.field_name().to_string(), serde_json::to_value(deps)?);
            }
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(&Value::Object(document), &mut serializer)?;

        let mut output = String::from_utf8_lossy(&buf).into_owned();
        output.push('\n');
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> PackageManifest {
        PackageManifest::parse(content, Path::new("package.json")).unwrap()
    }

    #[test]
    fn test_parse_sections() {
        let manifest = parse(
            r#"{
                "name": "@acme/web",
                "dependencies": { "react": "^18.2.0" },
                "devDependencies": { "typescript": "~5.0.0" },
                "peerDependencies": { "react-dom": "^18.0.0" }
            }"#,
        );
        assert_eq!(manifest.name.as_deref(), Some("@acme/web"));
        assert_eq!(
            manifest.section(DependencyKind::Runtime).unwrap()["react"],
            "^18.2.0"
        );
        assert_eq!(
            manifest.section(DependencyKind::Development).unwrap()["typescript"],
            "~5.0.0"
        );
        assert_eq!(
            manifest.section(DependencyKind::Peer).unwrap()["react-dom"],
            "^18.0.0"
        );
    }

    #[test]
    fn test_parse_missing_sections() {
        let manifest = parse("{}");
        assert!(manifest.section(DependencyKind::Runtime).is_none());
        assert!(manifest.name.is_none());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = PackageManifest::parse("not json", Path::new("package.json")).unwrap_err();
        assert!(err.to_string().contains("failed to parse JSON"));
    }

    #[test]
    fn test_parse_non_string_dependency() {
        let result = PackageManifest::parse(
            r#"{ "dependencies": { "react": 18 } }"#,
            Path::new("package.json"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_set_version() {
        let mut manifest = parse(r#"{ "dependencies": { "react": "^17.0.2" } }"#);
        assert!(manifest.set_version(DependencyKind::Runtime, "react", "^18.2.0"));
        assert!(!manifest.set_version(DependencyKind::Runtime, "vue", "^3.0.0"));
        assert!(!manifest.set_version(DependencyKind::Peer, "react", "^18.2.0"));
        assert_eq!(
            manifest.section(DependencyKind::Runtime).unwrap()["react"],
            "^18.2.0"
        );
    }

    #[test]
    fn test_round_trip_preserves_order_and_unknown_fields() {
        let content = r#"{
    "name": "web",
    "version": "1.0.0",
    "scripts": {
        "dev": "vite",
        "build": "vite build"
    },
    "dependencies": {
        "zod": "^3.0.0",
        "axios": "^1.0.0"
    },
    "private": true
}
"#;
        let mut manifest = parse(content);
        assert_eq!(manifest.to_json_string().unwrap(), content);

        manifest.set_version(DependencyKind::Runtime, "axios", "^1.6.0");
        assert_eq!(
            manifest.to_json_string().unwrap(),
            content.replace("^1.0.0", "^1.6.0")
        );
    }

    #[test]
    fn test_pnpm_overrides() {
        let manifest = parse(
            r#"{ "pnpm": { "overrides": { "react": "18.2.0", "axios@1": "1.6.0" } } }"#,
        );
        let overrides = manifest.pnpm_overrides(Path::new("package.json")).unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides["axios@1"], "1.6.0");
        assert_eq!(overrides.get_index(0).unwrap().0, "react");
    }

    #[test]
    fn test_pnpm_overrides_absent() {
        let manifest = parse(r#"{ "name": "root" }"#);
        assert!(manifest
            .pnpm_overrides(Path::new("package.json"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_pnpm_overrides_invalid() {
        let manifest = parse(r#"{ "pnpm": { "overrides": { "react": { "x": 1 } } } }"#);
        let err = manifest
            .pnpm_overrides(Path::new("package.json"))
            .unwrap_err();
        assert!(err.to_string().contains("pnpm.overrides.react"));
    }

    #[test]
    fn test_package_manager_version() {
        let manifest = parse(r#"{ "packageManager": "pnpm@9.1.0+sha512.abcdef" }"#);
        assert_eq!(manifest.package_manager_version(), Some("9.1.0"));

        let manifest = parse(r#"{ "packageManager": "pnpm@8.15.4" }"#);
        assert_eq!(manifest.package_manager_version(), Some("8.15.4"));

        assert_eq!(parse("{}").package_manager_version(), None);
    }
}
