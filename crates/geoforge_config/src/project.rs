//! Project file loading.

use crate::error::{ConfigError, ConfigResult};
use geoforge_alias::{create_context, AliasValue, ExtensionPolicy, ResolutionContext};
use geoforge_core::{contains_traversal, is_absolute, join, normalize, PathResolutionError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk shape of a project file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    /// Project name
    pub name: String,
    /// Project root, relative to the file's directory unless absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Nested alias namespace
    #[serde(default)]
    pub path_aliases: AliasValue,
    /// Extension candidates added to or replacing the built-in policy
    #[serde(default, skip_serializing_if = "ExtensionPolicy::is_empty")]
    pub extensions: ExtensionPolicy,
}

/// A parsed project file with its root made absolute
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    file: ProjectFile,
    root: String,
}

impl ProjectConfig {
    /// Load a project file from disk
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or its root is
    /// unsafe
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let path_display = path.display().to_string();
        let absolute = std::path::absolute(path).map_err(|source| ConfigError::Io {
            path: path_display.clone(),
            source,
        })?;
        let text = std::fs::read_to_string(&absolute).map_err(|source| ConfigError::Io {
            path: path_display.clone(),
            source,
        })?;

        let base_dir = absolute
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "/".to_string());

        let config = Self::parse(&text, &base_dir, &path_display)?;
        tracing::info!(
            project = config.name(),
            root = config.root(),
            file = %path_display,
            "loaded project"
        );
        Ok(config)
    }

    /// Parse a project document held in memory
    ///
    /// `base_dir` must be absolute; a relative `root` in the document is
    /// resolved against it.
    ///
    /// # Errors
    ///
    /// Returns error if the document cannot be parsed or its root is unsafe
    pub fn from_json(text: &str, base_dir: &str) -> ConfigResult<Self> {
        Self::parse(text, base_dir, "<memory>")
    }

    fn parse(text: &str, base_dir: &str, origin: &str) -> ConfigResult<Self> {
        let file: ProjectFile = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        Self::from_file(file, base_dir)
    }

    /// Bind an already-deserialized project file to a base directory
    ///
    /// # Errors
    ///
    /// Returns error if the base directory is relative or the root is unsafe
    pub fn from_file(file: ProjectFile, base_dir: &str) -> ConfigResult<Self> {
        if !is_absolute(base_dir) {
            return Err(PathResolutionError::InvalidProjectRoot {
                root: base_dir.to_string(),
            }
            .into());
        }

        let root = match file.root.as_deref() {
            Some(root) if contains_traversal(root) => {
                return Err(PathResolutionError::UnsafeTraversal {
                    reference: root.to_string(),
                    chain: Vec::new(),
                }
                .into());
            }
            Some(root) => normalize(&join(base_dir, root)),
            None => normalize(base_dir),
        };

        Ok(Self { file, root })
    }

    /// Get the project name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.file.name
    }

    /// Get the absolute project root
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Get the parsed project file
    #[must_use]
    pub const fn file(&self) -> &ProjectFile {
        &self.file
    }

    /// Built-in extension policy overlaid with the project's overrides
    #[must_use]
    pub fn extension_policy(&self) -> ExtensionPolicy {
        ExtensionPolicy::builtin().clone().merged(&self.file.extensions)
    }

    /// Build the resolution context for this project
    ///
    /// # Errors
    ///
    /// Returns error if the alias namespace is malformed
    pub fn to_context(&self) -> ConfigResult<ResolutionContext> {
        let context = create_context(self.name(), &self.root, &self.file.path_aliases)?;
        Ok(context.with_extensions(self.extension_policy()))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use geoforge_core::ErrorKind;

    const PROJECT: &str = r#"{
        "name": "site-plan",
        "root": "work",
        "pathAliases": {
            "data": {"input": "data/in", "output": "data/out"},
            "cad": {"template": "@data.input/templates"}
        },
        "extensions": {"kmlFile": ["kml"]}
    }"#;

    #[test]
    fn test_from_json() {
        let config = ProjectConfig::from_json(PROJECT, "/home/me/projects/site").unwrap();
        assert_eq!(config.name(), "site-plan");
        assert_eq!(config.root(), "/home/me/projects/site/work");
    }

    #[test]
    fn test_default_root_is_base_dir() {
        let config = ProjectConfig::from_json(r#"{"name": "p"}"#, "/srv/p/").unwrap();
        assert_eq!(config.root(), "/srv/p");
        assert_eq!(config.file().path_aliases, AliasValue::empty());
    }

    #[test]
    fn test_absolute_root() {
        let config =
            ProjectConfig::from_json(r#"{"name": "p", "root": "/data/gis"}"#, "/srv/p").unwrap();
        assert_eq!(config.root(), "/data/gis");
    }

    #[test]
    fn test_traversing_root_rejected() {
        let err =
            ProjectConfig::from_json(r#"{"name": "p", "root": "../other"}"#, "/srv/p").unwrap_err();
        assert_eq!(
            err.resolution_error().map(PathResolutionError::kind),
            Some(ErrorKind::UnsafeTraversal)
        );
    }

    #[test]
    fn test_relative_base_dir_rejected() {
        let err = ProjectConfig::from_json(r#"{"name": "p"}"#, "relative").unwrap_err();
        assert!(matches!(err, ConfigError::Resolution(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = ProjectConfig::from_json("{not json", "/srv").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = ProjectConfig::from_json(r#"{"root": "x"}"#, "/srv").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_to_context() {
        let config = ProjectConfig::from_json(PROJECT, "/srv/site").unwrap();
        let ctx = config.to_context().unwrap();
        assert_eq!(ctx.project_root(), "/srv/site/work");
        assert_eq!(ctx.aliases().len(), 3);
        assert!(ctx.context_extensions("kmlFile").is_some());
        assert!(ctx.context_extensions("geojsonFile").is_some());

        let resolved = geoforge_alias::Resolver::new()
            .resolve_path("@cad.template/a4.dxf", &ctx)
            .unwrap();
        assert_eq!(resolved, "/srv/site/work/data/in/templates/a4.dxf");
    }

    #[test]
    fn test_to_context_malformed_aliases() {
        let config =
            ProjectConfig::from_json(r#"{"name": "p", "pathAliases": {"a": 1}}"#, "/srv").unwrap();
        let err = config.to_context().unwrap_err();
        assert_eq!(
            err.resolution_error().map(PathResolutionError::kind),
            Some(ErrorKind::MalformedAliasTable)
        );
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("project.json");
        std::fs::write(&file, PROJECT).unwrap();

        let config = ProjectConfig::load(&file).unwrap();
        assert_eq!(config.root(), format!("{}/work", dir.path().display()));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
