//! Terminal output: diagnostics and tables.

mod diagnostic;
mod table;

pub use diagnostic::UnsolvedDiagnostic;
pub use table::{format_placeholder_table, PlaceholderRow};
