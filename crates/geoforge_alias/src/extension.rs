//! Extension inference for logical, extension-less references.

use geoforge_core::{has_extension, with_extension};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

static DEFAULT_POLICY: Lazy<ExtensionPolicy> = Lazy::new(|| {
    ExtensionPolicy::new()
        .with_entry("geojsonFile", [".geojson", ".json"])
        .with_entry("shapeFile", [".shp"])
        .with_entry("shapefile", [".shp"])
        .with_entry("dxfFile", [".dxf"])
        .with_entry("templateFile", [".dxf"])
        .with_entry("csvFile", [".csv"])
        .with_entry("jsonFile", [".json"])
        .with_entry("yamlFile", [".yaml", ".yml"])
        .with_entry("styleFile", [".yaml", ".yml"])
        .with_entry("excelFile", [".xlsx", ".xls"])
        .with_entry("gpkgFile", [".gpkg"])
        .with_entry("rasterFile", [".tif", ".tiff", ".png", ".jpg"])
});

/// Mapping from context keys to ordered candidate extensions
///
/// Extensions are stored with a leading `.` regardless of how they were
/// supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionPolicy {
    entries: IndexMap<String, Vec<String>>,
}

impl ExtensionPolicy {
    /// Create an empty policy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the built-in policy shared by every project
    #[must_use]
    pub fn builtin() -> &'static Self {
        &DEFAULT_POLICY
    }

    /// Add or replace the candidates for a context key
    #[must_use]
    pub fn with_entry<I, S>(mut self, context_key: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.entries.insert(
            context_key.into(),
            extensions.into_iter().map(|e| dotted(e.as_ref())).collect(),
        );
        self
    }

    /// Overlay another policy; its keys replace ours
    #[must_use]
    pub fn merged(mut self, overrides: &Self) -> Self {
        for (key, extensions) in &overrides.entries {
            self.entries
                .insert(key.clone(), extensions.iter().map(|e| dotted(e)).collect());
        }
        self
    }

    /// Get the candidates for a context key
    #[must_use]
    pub fn get(&self, context_key: &str) -> Option<&[String]> {
        self.entries.get(context_key).map(Vec::as_slice)
    }

    /// Iterate over known context keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Get the number of context keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the policy is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn dotted(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

/// Candidate extensions for a context key under the built-in policy
///
/// Unknown keys yield an empty list.
#[must_use]
pub fn get_context_extensions(context_key: &str) -> Vec<String> {
    ExtensionPolicy::builtin()
        .get(context_key)
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

/// Existence check used during extension inference
pub trait FileProbe {
    /// Check whether something exists at `path`
    fn exists(&self, path: &str) -> bool;
}

/// Probe backed by the local filesystem
///
/// Any error from `metadata` (missing file, permission denied, broken
/// symlink) is reported as "does not exist".
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn exists(&self, path: &str) -> bool {
        match std::fs::metadata(Path::new(path)) {
            Ok(_) => true,
            Err(err) => {
                tracing::trace!(path, error = %err, "probe miss");
                false
            }
        }
    }
}

impl<F> FileProbe for F
where
    F: Fn(&str) -> bool,
{
    fn exists(&self, path: &str) -> bool {
        self(path)
    }
}

/// Try each candidate extension in order and return the first existing path
///
/// Paths that already carry an extension are returned unchanged, as is the
/// bare path when no candidate exists.
pub fn infer_extension<P, S>(path: &str, candidates: &[S], probe: &P) -> String
where
    P: FileProbe + ?Sized,
    S: AsRef<str>,
{
    if has_extension(path) {
        return path.to_string();
    }

    for candidate in candidates {
        let with_ext = with_extension(path, candidate.as_ref());
        if probe.exists(&with_ext) {
            tracing::debug!(path, found = %with_ext, "inferred extension");
            return with_ext;
        }
    }

    tracing::debug!(path, candidates = candidates.len(), "no candidate extension found");
    path.to_string()
}
