//! Template construction errors.

use thiserror::Error;

use crate::types::ValueKind;

/// An error raised when a template cannot be built from its input.
///
/// Any `&str` compiles; these errors only arise at the dynamic edges where the
/// template text comes from bytes or from untyped configuration data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// The template bytes are not valid UTF-8.
    #[error("template is not valid UTF-8")]
    InvalidUtf8,

    /// The template value is not a string.
    #[error("template must be a string, not {kind}")]
    NotAString { kind: ValueKind },
}
