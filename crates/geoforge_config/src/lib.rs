//! GEOFORGE Project Configuration
//!
//! Loads project files, binds their alias namespace into a
//! [`ResolutionContext`](geoforge_alias::ResolutionContext), and rewrites
//! alias references found in other configuration documents.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod project;
pub mod rewrite;

pub use error::{ConfigError, ConfigResult};
pub use project::{ProjectConfig, ProjectFile};
pub use rewrite::PathRewriter;
