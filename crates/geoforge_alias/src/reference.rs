//! Reference expression parsing.
//!
//! A reference is either a plain path (`data/in/file.geojson`) or an alias
//! reference (`@data.input/file.geojson`). In the alias form the text before
//! the first `/` names the alias and everything after it is a sub-path whose
//! components may themselves be alias references
//! (`@cad.input/@survey.raw/file.dxf`).

use geoforge_core::{AliasName, PathResolutionError, ResolveResult};

/// Prefix marking an alias reference
pub const ALIAS_PREFIX: char = '@';

/// Parsed shape of a reference string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceExpression<'a> {
    /// Plain relative or absolute path
    Plain(&'a str),
    /// Alias reference with optional sub-path
    Alias {
        /// Alias part including the leading `@`
        alias_part: &'a str,
        /// Validated bare alias name
        name: AliasName,
        /// Text after the first `/`, never empty
        sub_path: Option<&'a str>,
    },
}

impl<'a> ReferenceExpression<'a> {
    /// Parse a reference string
    ///
    /// # Errors
    ///
    /// Returns [`PathResolutionError::InvalidAliasSyntax`] if the string
    /// starts with `@` but the alias name is malformed
    pub fn parse(reference: &'a str) -> ResolveResult<Self> {
        if !is_alias_reference(reference) {
            return Ok(Self::Plain(reference));
        }

        let (alias_part, sub_path) = split_alias(reference);
        let bare = &alias_part[ALIAS_PREFIX.len_utf8()..];
        let name = AliasName::new(bare)
            .map_err(|e| PathResolutionError::syntax(reference, e.to_string()))?;

        Ok(Self::Alias {
            alias_part,
            name,
            sub_path,
        })
    }

    /// Check if this is an alias reference
    #[must_use]
    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Alias { .. })
    }
}

/// Check whether a string uses alias syntax at all (starts with `@`)
#[must_use]
pub fn is_alias_reference(candidate: &str) -> bool {
    candidate.starts_with(ALIAS_PREFIX)
}

fn split_alias(reference: &str) -> (&str, Option<&str>) {
    match reference.find('/') {
        Some(idx) => {
            let sub_path = &reference[idx + 1..];
            (&reference[..idx], (!sub_path.is_empty()).then_some(sub_path))
        }
        None => (reference, None),
    }
}

/// Pure syntax check: is this a well-formed alias reference?
///
/// The alias part and every `@` component of the sub-path must carry a valid
/// name. No table lookup is performed.
#[must_use]
pub fn validate_alias_reference(candidate: &str) -> bool {
    let Ok(ReferenceExpression::Alias { sub_path, .. }) = ReferenceExpression::parse(candidate)
    else {
        return false;
    };

    sub_path.is_none_or(|sub| {
        sub.split('/')
            .filter(|component| is_alias_reference(component))
            .all(|component| AliasName::is_valid(&component[ALIAS_PREFIX.len_utf8()..]))
    })
}

/// Split an alias reference into its alias part (with `@`) and sub-path
///
/// # Errors
///
/// Returns [`PathResolutionError::InvalidAliasSyntax`] if the string is not
/// an alias reference or its name is malformed
pub fn extract_alias_and_subpath(reference: &str) -> ResolveResult<(String, Option<String>)> {
    match ReferenceExpression::parse(reference)? {
        ReferenceExpression::Alias {
            alias_part,
            sub_path,
            ..
        } => Ok((alias_part.to_string(), sub_path.map(str::to_string))),
        ReferenceExpression::Plain(_) => Err(PathResolutionError::syntax(
            reference,
            "alias references must start with '@'",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoforge_core::ErrorKind;

    #[test]
    fn test_parse_plain() {
        assert_eq!(
            ReferenceExpression::parse("data/in/file.geojson").unwrap(),
            ReferenceExpression::Plain("data/in/file.geojson")
        );
        assert!(!ReferenceExpression::parse("/abs/path").unwrap().is_alias());
    }

    #[test]
    fn test_parse_alias_without_subpath() {
        let parsed = ReferenceExpression::parse("@data.input").unwrap();
        let ReferenceExpression::Alias {
            alias_part,
            name,
            sub_path,
        } = parsed
        else {
            panic!("expected alias");
        };
        assert_eq!(alias_part, "@data.input");
        assert_eq!(name.as_str(), "data.input");
        assert_eq!(sub_path, None);
    }

    #[test]
    fn test_parse_alias_with_nested_subpath() {
        let parsed = ReferenceExpression::parse("@cad.input/@survey.raw/file.dxf").unwrap();
        let ReferenceExpression::Alias { name, sub_path, .. } = parsed else {
            panic!("expected alias");
        };
        assert_eq!(name.as_str(), "cad.input");
        assert_eq!(sub_path, Some("@survey.raw/file.dxf"));
    }

    #[test]
    fn test_parse_trailing_slash_has_no_subpath() {
        let parsed = ReferenceExpression::parse("@data/").unwrap();
        assert!(matches!(parsed, ReferenceExpression::Alias { sub_path: None, .. }));
    }

    #[test]
    fn test_parse_invalid_alias() {
        for bad in ["@", "@/file", "@.data", "@data.", "@a..b", "@a b/file", "@@a"] {
            let err = ReferenceExpression::parse(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidAliasSyntax, "{bad}");
            assert_eq!(err.reference(), bad);
        }
    }

    #[test]
    fn test_validate_alias_reference() {
        assert!(validate_alias_reference("@data.input"));
        assert!(validate_alias_reference("@data.input/file.geojson"));
        assert!(validate_alias_reference("@cad.input/@survey.raw/file.dxf"));
        assert!(!validate_alias_reference("data/input"));
        assert!(!validate_alias_reference("@"));
        assert!(!validate_alias_reference("@a..b"));
        assert!(!validate_alias_reference("@cad/@/file"));
        assert!(!validate_alias_reference("@cad/@bad..name"));
    }

    #[test]
    fn test_extract_alias_and_subpath() {
        assert_eq!(
            extract_alias_and_subpath("@data.input/sub/file.json").unwrap(),
            ("@data.input".to_string(), Some("sub/file.json".to_string()))
        );
        assert_eq!(
            extract_alias_and_subpath("@data.input").unwrap(),
            ("@data.input".to_string(), None)
        );
        let err = extract_alias_and_subpath("plain/path").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAliasSyntax);
    }
}
