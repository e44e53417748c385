/*!
Single-pattern glob matching against normalized paths.

This crate implements the narrow glob dialect used throughout the rest of
the workspace to express include/exclude filters and `.zenithignore`
entries: `?`, `*`, and `**`, interpreted against forward-slash paths. It
deliberately does not support character classes, brace alternation, or
case-insensitive matching — those belong to a general-purpose glob engine,
not this one.
*/

mod glob;
mod pathutil;

pub use crate::glob::{Glob, glob_match};
pub use crate::pathutil::{lexically_normalize, to_forward_slashes};
