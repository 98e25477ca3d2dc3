//! Alias enumeration for diagnostics and tooling.

use crate::context::ResolutionContext;
use crate::extension::FileProbe;
use crate::reference::ALIAS_PREFIX;
use crate::resolver::Resolver;
use indexmap::IndexMap;

/// Resolve every alias (optionally under a name prefix) to its absolute path
///
/// The result is sorted by alias name. Aliases that fail to resolve are
/// logged and left out; use [`Resolver::resolve_path`] on a single alias to
/// get the error itself.
pub fn list_aliases_with<P: FileProbe>(
    resolver: &Resolver<P>,
    context: &ResolutionContext,
    prefix_filter: Option<&str>,
) -> IndexMap<String, String> {
    let prefix = prefix_filter
        .map(|p| p.strip_prefix(ALIAS_PREFIX).unwrap_or(p))
        .unwrap_or_default();

    let mut listed = IndexMap::new();
    for name in context.aliases().names().filter(|n| n.starts_with(prefix)) {
        let reference = format!("{ALIAS_PREFIX}{name}");
        match resolver.resolve_path(&reference, context) {
            Ok(path) => {
                listed.insert(name.to_string(), path);
            }
            Err(err) => {
                tracing::warn!(alias = %name, error = %err, "skipping unresolvable alias");
            }
        }
    }

    listed.sort_keys();
    listed
}

/// Resolve every alias using the filesystem-backed resolver
#[must_use]
pub fn list_available_aliases(
    context: &ResolutionContext,
    prefix_filter: Option<&str>,
) -> IndexMap<String, String> {
    list_aliases_with(&Resolver::new(), context, prefix_filter)
}
