//! Alias rewriting for configuration documents.
//!
//! Downstream loaders and exporters receive configuration values that may
//! start with `@`. The rewriter walks a document and replaces each such value
//! with its resolved absolute path, using the enclosing object key (for
//! example `geojsonFile`) as the context key for extension inference.

use crate::error::{ConfigError, ConfigResult};
use geoforge_alias::{is_alias_reference, FileProbe, FsProbe, ResolutionContext, Resolver};
use serde_json::Value;

/// Keys whose subtrees are never rewritten
const DEFAULT_SKIP_KEYS: &[&str] = &["pathAliases"];

/// Walks JSON documents and resolves every alias-valued string
pub struct PathRewriter<'a, P = FsProbe> {
    context: &'a ResolutionContext,
    resolver: Resolver<P>,
    skip_keys: Vec<String>,
}

impl<'a> PathRewriter<'a, FsProbe> {
    /// Create a rewriter that probes the local filesystem
    #[must_use]
    pub fn new(context: &'a ResolutionContext) -> Self {
        Self::with_resolver(context, Resolver::new())
    }
}

impl<'a, P: FileProbe> PathRewriter<'a, P> {
    /// Create a rewriter with a custom resolver
    #[must_use]
    pub fn with_resolver(context: &'a ResolutionContext, resolver: Resolver<P>) -> Self {
        Self {
            context,
            resolver,
            skip_keys: DEFAULT_SKIP_KEYS.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// Also leave the subtree under `key` untouched
    #[must_use]
    pub fn skip_key(mut self, key: impl Into<String>) -> Self {
        self.skip_keys.push(key.into());
        self
    }

    /// Return a copy of `document` with every alias reference resolved
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Rewrite`] with the JSON pointer of the first
    /// value that fails to resolve
    pub fn rewrite(&self, document: &Value) -> ConfigResult<Value> {
        let mut out = document.clone();
        let rewritten = self.rewrite_in_place(&mut out)?;
        tracing::debug!(rewritten, "rewrote alias references");
        Ok(out)
    }

    /// Resolve every alias reference in `document` in place
    ///
    /// Returns the number of values that were replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Rewrite`] with the JSON pointer of the first
    /// value that fails to resolve
    pub fn rewrite_in_place(&self, document: &mut Value) -> ConfigResult<usize> {
        let mut pointer = String::new();
        self.walk(document, None, &mut pointer)
    }

    fn walk(
        &self,
        value: &mut Value,
        key: Option<&str>,
        pointer: &mut String,
    ) -> ConfigResult<usize> {
        match value {
            Value::String(s) if is_alias_reference(s.as_str()) => {
                let resolved = self
                    .resolver
                    .resolve(s, self.context, key)
                    .map_err(|source| ConfigError::Rewrite {
                        pointer: display_pointer(pointer),
                        source,
                    })?;
                *s = resolved;
                Ok(1)
            }
            Value::Object(map) => {
                let mut count = 0;
                for (child_key, child) in map.iter_mut() {
                    if self.skip_keys.iter().any(|k| k == child_key) {
                        continue;
                    }
                    let len = pointer.len();
                    push_token(pointer, child_key);
                    count += self.walk(child, Some(child_key.as_str()), pointer)?;
                    pointer.truncate(len);
                }
                Ok(count)
            }
            Value::Array(items) => {
                let mut count = 0;
                for (index, item) in items.iter_mut().enumerate() {
                    let len = pointer.len();
                    push_token(pointer, &index.to_string());
                    count += self.walk(item, key, pointer)?;
                    pointer.truncate(len);
                }
                Ok(count)
            }
            _ => Ok(0),
        }
    }
}

/// Append an RFC 6901 reference token
fn push_token(pointer: &mut String, token: &str) {
    pointer.push('/');
    for ch in token.chars() {
        match ch {
            '~' => pointer.push_str("~0"),
            '/' => pointer.push_str("~1"),
            _ => pointer.push(ch),
        }
    }
}

fn display_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
