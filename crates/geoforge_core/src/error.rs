//! Resolution error types for GEOFORGE.

/// Result type for alias resolution
pub type ResolveResult<T> = Result<T, PathResolutionError>;

/// Error raised while building an alias table or resolving a reference.
///
/// Every variant carries the offending reference (or table path) and, where a
/// resolution was in flight, the chain of references visited so far.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathResolutionError {
    /// Reference does not follow the `@name.part/sub/path` grammar
    #[error("Invalid alias syntax in '{reference}': {reason} (chain: {})", render_chain(.chain))]
    InvalidAliasSyntax {
        /// Offending reference
        reference: String,
        /// What is wrong with it
        reason: String,
        /// References visited before the failure
        chain: Vec<String>,
    },

    /// Alias name is not present in the table
    #[error(
        "Alias '{alias}' not found while resolving '{reference}' (chain: {})",
        render_chain(.chain)
    )]
    AliasNotFound {
        /// Reference that named the alias
        reference: String,
        /// Bare alias name that was looked up
        alias: String,
        /// References visited before the failure
        chain: Vec<String>,
    },

    /// Alias expansion re-entered an alias that is still being expanded
    #[error("Circular alias reference at '{reference}' (chain: {})", render_chain(.chain))]
    CircularReference {
        /// Reference that closed the cycle
        reference: String,
        /// References visited before the failure
        chain: Vec<String>,
    },

    /// Alias-to-alias indirection exceeded the depth limit
    #[error("Alias chain exceeds {max} levels at '{reference}' (chain: {})", render_chain(.chain))]
    ChainTooDeep {
        /// Reference at which the limit was hit
        reference: String,
        /// References visited before the failure
        chain: Vec<String>,
        /// Configured limit
        max: usize,
    },

    /// Reference, alias target or sub-path component contains a `..` segment
    #[error("Unsafe path traversal in '{reference}' (chain: {})", render_chain(.chain))]
    UnsafeTraversal {
        /// Offending reference or target
        reference: String,
        /// References visited before the failure
        chain: Vec<String>,
    },

    /// Alias namespace could not be flattened into a table
    #[error("Malformed alias table at '{path}': {reason}")]
    MalformedAliasTable {
        /// Dotted path of the offending entry
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// Project root is not an absolute path
    #[error("Project root must be an absolute path: '{root}'")]
    InvalidProjectRoot {
        /// Offending root
        root: String,
    },
}

/// Discriminant of a [`PathResolutionError`], for callers that branch on kind only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`PathResolutionError::InvalidAliasSyntax`]
    InvalidAliasSyntax,
    /// See [`PathResolutionError::AliasNotFound`]
    AliasNotFound,
    /// See [`PathResolutionError::CircularReference`]
    CircularReference,
    /// See [`PathResolutionError::ChainTooDeep`]
    ChainTooDeep,
    /// See [`PathResolutionError::UnsafeTraversal`]
    UnsafeTraversal,
    /// See [`PathResolutionError::MalformedAliasTable`]
    MalformedAliasTable,
    /// See [`PathResolutionError::InvalidProjectRoot`]
    InvalidProjectRoot,
}

impl PathResolutionError {
    /// Get the error kind
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAliasSyntax { .. } => ErrorKind::InvalidAliasSyntax,
            Self::AliasNotFound { .. } => ErrorKind::AliasNotFound,
            Self::CircularReference { .. } => ErrorKind::CircularReference,
            Self::ChainTooDeep { .. } => ErrorKind::ChainTooDeep,
            Self::UnsafeTraversal { .. } => ErrorKind::UnsafeTraversal,
            Self::MalformedAliasTable { .. } => ErrorKind::MalformedAliasTable,
            Self::InvalidProjectRoot { .. } => ErrorKind::InvalidProjectRoot,
        }
    }

    /// Get the offending reference, table path, or root
    #[must_use]
    pub fn reference(&self) -> &str {
        match self {
            Self::InvalidAliasSyntax { reference, .. }
            | Self::AliasNotFound { reference, .. }
            | Self::CircularReference { reference, .. }
            | Self::ChainTooDeep { reference, .. }
            | Self::UnsafeTraversal { reference, .. } => reference,
            Self::MalformedAliasTable { path, .. } => path,
            Self::InvalidProjectRoot { root } => root,
        }
    }

    /// Get the resolution chain, empty for errors raised outside a resolution
    #[must_use]
    pub fn chain(&self) -> &[String] {
        match self {
            Self::InvalidAliasSyntax { chain, .. }
            | Self::AliasNotFound { chain, .. }
            | Self::CircularReference { chain, .. }
            | Self::ChainTooDeep { chain, .. }
            | Self::UnsafeTraversal { chain, .. } => chain,
            _ => &[],
        }
    }

    /// Build an [`PathResolutionError::InvalidAliasSyntax`] outside any chain
    pub fn syntax(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAliasSyntax {
            reference: reference.into(),
            reason: reason.into(),
            chain: Vec::new(),
        }
    }

    /// Attach the resolution chain the error was raised in
    ///
    /// Variants without a chain are returned unchanged.
    #[must_use]
    pub fn with_chain(mut self, references: Vec<String>) -> Self {
        match &mut self {
            Self::InvalidAliasSyntax { chain, .. }
            | Self::AliasNotFound { chain, .. }
            | Self::CircularReference { chain, .. }
            | Self::ChainTooDeep { chain, .. }
            | Self::UnsafeTraversal { chain, .. } => *chain = references,
            Self::MalformedAliasTable { .. } | Self::InvalidProjectRoot { .. } => {}
        }
        self
    }

    /// Build an [`PathResolutionError::MalformedAliasTable`]
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedAliasTable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn render_chain(chain: &[String]) -> String {
    if chain.is_empty() {
        "<empty>".to_string()
    } else {
        chain.join(" -> ")
    }
}
