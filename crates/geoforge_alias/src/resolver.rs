//! Recursive alias resolution.
//!
//! Resolution turns a reference into a normalized absolute path:
//!
//! 1. Plain paths are checked for traversal and joined onto the project root.
//! 2. Alias references are looked up in the table. A target that is itself an
//!    alias reference is resolved first ("chaining"), bounded by
//!    [`MAX_CHAIN_DEPTH`] hops and guarded against cycles.
//! 3. Sub-path components starting with `@` are resolved on their own,
//!    re-expressed relative to the project root when they fall inside it, and
//!    rejoined onto the alias base.
//! 4. Optionally, an extension-less result is completed by probing candidate
//!    extensions.

use crate::chain::{ResolutionChain, MAX_CHAIN_DEPTH};
use crate::context::ResolutionContext;
use crate::extension::{infer_extension, FileProbe, FsProbe};
use crate::reference::{is_alias_reference, ReferenceExpression};
use geoforge_core::{
    contains_traversal, has_extension, is_absolute, join, normalize, relative_to, AliasName,
    PathResolutionError, ResolveResult,
};

/// Stateless resolver; the probe is only consulted for extension inference
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver<P = FsProbe> {
    probe: P,
}

impl Resolver<FsProbe> {
    /// Create a resolver that probes the local filesystem
    #[must_use]
    pub fn new() -> Self {
        Self { probe: FsProbe }
    }
}

impl<P: FileProbe> Resolver<P> {
    /// Create a resolver with a custom existence probe
    #[must_use]
    pub fn with_probe(probe: P) -> Self {
        Self { probe }
    }

    /// Resolve a reference, inferring an extension from `context_key`
    ///
    /// Inference only runs when the resolved path has no extension and the
    /// key is known to the context's policy.
    ///
    /// # Errors
    ///
    /// Returns error on any syntax, lookup, cycle, depth, or traversal
    /// violation
    pub fn resolve(
        &self,
        reference: &str,
        context: &ResolutionContext,
        context_key: Option<&str>,
    ) -> ResolveResult<String> {
        let resolved = self.resolve_path(reference, context)?;
        if has_extension(&resolved) {
            return Ok(resolved);
        }

        match context_key.and_then(|key| context.context_extensions(key)) {
            Some(candidates) => Ok(infer_extension(&resolved, candidates, &self.probe)),
            None => Ok(resolved),
        }
    }

    /// Resolve a reference, inferring an extension from an explicit list
    ///
    /// # Errors
    ///
    /// Returns error on any syntax, lookup, cycle, depth, or traversal
    /// violation
    pub fn resolve_with_extensions<S: AsRef<str>>(
        &self,
        reference: &str,
        context: &ResolutionContext,
        extensions: &[S],
    ) -> ResolveResult<String> {
        let resolved = self.resolve_path(reference, context)?;
        Ok(infer_extension(&resolved, extensions, &self.probe))
    }

    /// Resolve only alias references; plain strings yield `None`
    ///
    /// # Errors
    ///
    /// Returns error if the string is an alias reference that fails to resolve
    pub fn resolve_alias_only(
        &self,
        reference: &str,
        context: &ResolutionContext,
    ) -> ResolveResult<Option<String>> {
        if !is_alias_reference(reference) {
            return Ok(None);
        }
        self.resolve_path(reference, context).map(Some)
    }

    /// Resolve a reference without extension inference
    ///
    /// # Errors
    ///
    /// Returns error on any syntax, lookup, cycle, depth, or traversal
    /// violation
    pub fn resolve_path(
        &self,
        reference: &str,
        context: &ResolutionContext,
    ) -> ResolveResult<String> {
        resolve_reference(reference, context, &ResolutionChain::new())
    }
}

fn resolve_reference(
    reference: &str,
    context: &ResolutionContext,
    chain: &ResolutionChain,
) -> ResolveResult<String> {
    let expression =
        ReferenceExpression::parse(reference).map_err(|err| err.with_chain(chain.references()))?;
    match expression {
        ReferenceExpression::Plain(path) => resolve_plain(path, context, chain),
        ReferenceExpression::Alias { name, sub_path, .. } => {
            resolve_alias(reference, &name, sub_path, context, chain)
        }
    }
}

fn resolve_plain(
    path: &str,
    context: &ResolutionContext,
    chain: &ResolutionChain,
) -> ResolveResult<String> {
    if contains_traversal(path) {
        return Err(PathResolutionError::UnsafeTraversal {
            reference: path.to_string(),
            chain: chain.references(),
        });
    }

    if is_absolute(path) {
        Ok(normalize(path))
    } else {
        Ok(normalize(&join(context.project_root(), path)))
    }
}

fn resolve_alias(
    reference: &str,
    name: &AliasName,
    sub_path: Option<&str>,
    context: &ResolutionContext,
    parent: &ResolutionChain,
) -> ResolveResult<String> {
    if parent.depth() > MAX_CHAIN_DEPTH {
        return Err(PathResolutionError::ChainTooDeep {
            reference: reference.to_string(),
            chain: parent.references(),
            max: MAX_CHAIN_DEPTH,
        });
    }
    if parent.contains_alias(name) {
        return Err(PathResolutionError::CircularReference {
            reference: reference.to_string(),
            chain: parent.references_with(reference),
        });
    }
    if sub_path.is_some_and(contains_traversal) {
        return Err(PathResolutionError::UnsafeTraversal {
            reference: reference.to_string(),
            chain: parent.references(),
        });
    }

    let chain = parent.extended(reference, name);
    if let Some(sub) = sub_path {
        check_sub_path_syntax(sub, &chain)?;
    }
    let target = context
        .aliases()
        .get(name.as_str())
        .ok_or_else(|| PathResolutionError::AliasNotFound {
            reference: reference.to_string(),
            alias: name.to_string(),
            chain: chain.references(),
        })?;

    if contains_traversal(target) {
        return Err(PathResolutionError::UnsafeTraversal {
            reference: target.to_string(),
            chain: chain.references(),
        });
    }

    let base = if is_alias_reference(target) {
        tracing::debug!(
            alias = %name,
            raw_target = target,
            depth = chain.depth(),
            "following alias chain"
        );
        resolve_reference(target, context, &chain)?
    } else if is_absolute(target) {
        normalize(target)
    } else {
        normalize(&join(context.project_root(), target))
    };

    match sub_path {
        Some(sub) => resolve_sub_path(&base, sub, context, parent),
        None => Ok(base),
    }
}

/// Reject malformed `@` components before any of them is resolved.
fn check_sub_path_syntax(sub_path: &str, chain: &ResolutionChain) -> ResolveResult<()> {
    for component in sub_path.split('/').filter(|c| is_alias_reference(c)) {
        ReferenceExpression::parse(component).map_err(|err| err.with_chain(chain.references()))?;
    }
    Ok(())
}

/// Resolve `@` components of a sub-path and join the result onto `base`.
///
/// Components see the chain of the enclosing reference's parent: the
/// enclosing alias has finished expanding by the time its sub-path is
/// resolved, so reusing it as a component is not a cycle.
fn resolve_sub_path(
    base: &str,
    sub_path: &str,
    context: &ResolutionContext,
    chain: &ResolutionChain,
) -> ResolveResult<String> {
    let mut components = Vec::new();
    for component in sub_path.split('/') {
        if is_alias_reference(component) {
            let resolved = resolve_reference(component, context, chain)?;
            components.push(relative_to(&resolved, context.project_root()).unwrap_or(resolved));
        } else {
            components.push(component.to_string());
        }
    }

    let joined = components.join("/");
    Ok(normalize(&join(base, &joined)))
}
