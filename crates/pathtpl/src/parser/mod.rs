//! Template compiler.
//!
//! Turns a raw template string into an immutable tree of literal text,
//! placeholders and optional regions. The tree is built once and can be
//! filled any number of times.

pub mod ast;
pub mod error;
mod key;
mod template;

pub use ast::*;
pub use error::CompileError;
pub use key::{insert_nested, is_balanced, join_path, path_segments, split_format_spec};
pub use template::parse_template;
