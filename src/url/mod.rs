//! URL handling module
//!
//! This module provides redirect target resolution and ignore-pattern matching.

mod matcher;
mod resolve;

pub use matcher::IgnoreRules;
pub use resolve::resolve_redirect;
