//! GEOFORGE Core Types
//!
//! Pure types and logic shared by the alias engine and its collaborators.
//! Nothing in this crate touches the filesystem.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod name;
pub mod path;

// Re-exports
pub use error::{ErrorKind, PathResolutionError, ResolveResult};
pub use name::{AliasName, NameError, ALIAS_NAME_PATTERN};
pub use path::{
    contains_traversal, has_extension, is_absolute, join, normalize, relative_to,
    with_extension,
};
