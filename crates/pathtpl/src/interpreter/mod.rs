//! Template formatter.
//!
//! Fills a compiled template against input data, producing the output text
//! together with a diagnosis of every placeholder that could not be resolved.

mod error;
mod evaluator;
pub mod format_spec;
mod scratch;

pub use error::{TemplateUnsolved, compute_suggestions};
pub use evaluator::eval_template;
pub use format_spec::{FormatSpec, FormatSpecError, apply_format_spec};
