//! Lexical path helpers.
//!
//! All functions here operate on path strings only; none of them consult the
//! filesystem, follow symlinks, or canonicalize.

use std::path::{Component, Path, PathBuf};

/// Check whether a path is absolute on the host platform
#[must_use]
pub fn is_absolute(path: &str) -> bool {
    Path::new(path).is_absolute()
}

/// Check whether any segment of the path is `..`
///
/// Both `/` and `\` count as separators so that Windows-style input cannot
/// slip a parent segment past the check.
#[must_use]
pub fn contains_traversal(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

/// Join `rest` onto `base`; an absolute `rest` replaces `base`
#[must_use]
pub fn join(base: &str, rest: &str) -> String {
    path_to_string(&Path::new(base).join(rest))
}

/// Collapse `.` segments, repeated separators, trailing separators, and
/// resolve `..` lexically.
#[must_use]
pub fn normalize(path: &str) -> String {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    let mut rooted = false;

    for component in Path::new(path).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                out.push(component.as_os_str());
                rooted = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !rooted {
                    out.push("..");
                }
            }
            Component::Normal(segment) => {
                out.push(segment);
                depth += 1;
            }
        }
    }

    if out.as_os_str().is_empty() {
        return ".".to_string();
    }
    path_to_string(&out)
}

/// Express `path` relative to `root` when it lies inside it
///
/// Returns `"."` when both are equal and `None` when `path` is outside `root`.
#[must_use]
pub fn relative_to(path: &str, root: &str) -> Option<String> {
    let stripped = Path::new(path).strip_prefix(Path::new(root)).ok()?;
    if stripped.as_os_str().is_empty() {
        return Some(".".to_string());
    }
    Some(path_to_string(stripped))
}

/// Check whether the final segment of the path contains a `.`
#[must_use]
pub fn has_extension(path: &str) -> bool {
    path.rsplit(['/', '\\'])
        .next()
        .is_some_and(|segment| segment.contains('.'))
}

/// Append an extension, adding the leading `.` when missing
#[must_use]
pub fn with_extension(path: &str, extension: &str) -> String {
    if extension.starts_with('.') {
        format!("{path}{extension}")
    } else {
        format!("{path}.{extension}")
    }
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
