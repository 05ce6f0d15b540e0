//! importscope - lexical import extraction and usage location
//!
//! This crate extracts import/require declarations from Python and
//! JavaScript/TypeScript source text and locates every textual use of each
//! imported name within the same file, rejecting matches inside comments,
//! string literals, and the import statement itself.

pub mod export;
pub mod scanner;
pub mod text;
pub mod usage;
