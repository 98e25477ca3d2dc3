//! GEOFORGE Alias Engine
//!
//! Resolves symbolic path references such as `@data.input/file.geojson`
//! found throughout project configuration into absolute filesystem paths.
//!
//! ```text
//! nested namespace ──flatten──▶ AliasTable ──▶ ResolutionContext
//!                                                   │
//!                     reference [, context key] ──▶ Resolver ──▶ absolute path
//! ```
//!
//! The engine is pure apart from read-only existence probes during extension
//! inference; contexts are immutable and can be shared across threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod context;
pub mod extension;
pub mod listing;
pub mod namespace;
pub mod reference;
pub mod resolver;
pub mod table;

pub use chain::{ChainLink, ResolutionChain, MAX_CHAIN_DEPTH};
pub use context::{create_context, ResolutionContext};
pub use extension::{get_context_extensions, infer_extension, ExtensionPolicy, FileProbe, FsProbe};
pub use listing::{list_aliases_with, list_available_aliases};
pub use namespace::AliasValue;
pub use reference::{
    extract_alias_and_subpath, is_alias_reference, validate_alias_reference, ReferenceExpression,
    ALIAS_PREFIX,
};
pub use resolver::Resolver;
pub use table::AliasTable;

pub use geoforge_core::{ErrorKind, PathResolutionError, ResolveResult};

/// Resolve a reference against the filesystem, inferring an extension from
/// `context_key` when the result has none
///
/// # Errors
///
/// Returns error on any syntax, lookup, cycle, depth, or traversal violation
pub fn resolve(
    reference: &str,
    context: &ResolutionContext,
    context_key: Option<&str>,
) -> ResolveResult<String> {
    Resolver::new().resolve(reference, context, context_key)
}

/// Resolve a reference, probing the given extensions when the result has none
///
/// # Errors
///
/// Returns error on any syntax, lookup, cycle, depth, or traversal violation
pub fn resolve_with_extensions<S: AsRef<str>>(
    reference: &str,
    context: &ResolutionContext,
    extensions: &[S],
) -> ResolveResult<String> {
    Resolver::new().resolve_with_extensions(reference, context, extensions)
}

/// Resolve a string only if it is an alias reference
///
/// # Errors
///
/// Returns error if the string is an alias reference that fails to resolve
pub fn resolve_alias_only(
    reference: &str,
    context: &ResolutionContext,
) -> ResolveResult<Option<String>> {
    Resolver::new().resolve_alias_only(reference, context)
}
