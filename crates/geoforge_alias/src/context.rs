//! Per-project resolution context.

use crate::extension::ExtensionPolicy;
use crate::namespace::AliasValue;
use crate::table::AliasTable;
use geoforge_core::{contains_traversal, is_absolute, normalize, PathResolutionError, ResolveResult};

/// Immutable binding of a project root to its alias table
///
/// Created once per project session and shared by reference (or `Arc`)
/// between every resolution; it holds no interior mutability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionContext {
    project_name: String,
    project_root: String,
    aliases: AliasTable,
    extensions: ExtensionPolicy,
}

impl ResolutionContext {
    /// Create a context with the built-in extension policy
    ///
    /// # Errors
    ///
    /// Returns [`PathResolutionError::InvalidProjectRoot`] if the root is not
    /// absolute, and [`PathResolutionError::UnsafeTraversal`] if it contains
    /// a `..` segment
    pub fn new(
        project_name: impl Into<String>,
        project_root: impl AsRef<str>,
        aliases: AliasTable,
    ) -> ResolveResult<Self> {
        let root = project_root.as_ref();
        if !is_absolute(root) {
            return Err(PathResolutionError::InvalidProjectRoot {
                root: root.to_string(),
            });
        }
        if contains_traversal(root) {
            return Err(PathResolutionError::UnsafeTraversal {
                reference: root.to_string(),
                chain: Vec::new(),
            });
        }

        Ok(Self {
            project_name: project_name.into(),
            project_root: normalize(root),
            aliases,
            extensions: ExtensionPolicy::builtin().clone(),
        })
    }

    /// Replace the extension policy
    #[must_use]
    pub fn with_extensions(mut self, extensions: ExtensionPolicy) -> Self {
        self.extensions = extensions;
        self
    }

    /// Get the project name
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Get the normalized absolute project root
    #[must_use]
    pub fn project_root(&self) -> &str {
        &self.project_root
    }

    /// Get the alias table
    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Get the extension policy
    #[must_use]
    pub const fn extensions(&self) -> &ExtensionPolicy {
        &self.extensions
    }

    /// Candidate extensions for a context key in this project
    #[must_use]
    pub fn context_extensions(&self, context_key: &str) -> Option<&[String]> {
        self.extensions.get(context_key)
    }
}

/// Flatten a namespace and bind it to a project root
///
/// # Errors
///
/// Returns error if the namespace is malformed or the root is not absolute
pub fn create_context(
    project_name: impl Into<String>,
    project_root: impl AsRef<str>,
    alias_namespace: &AliasValue,
) -> ResolveResult<ResolutionContext> {
    let aliases = AliasTable::flatten(alias_namespace)?;
    let context = ResolutionContext::new(project_name, project_root, aliases)?;
    tracing::debug!(
        project = context.project_name(),
        root = context.project_root(),
        aliases = context.aliases().len(),
        "created resolution context"
    );
    Ok(context)
}
