//! CLI command implementations.

mod check;
mod fill;

pub use check::{run_check, CheckArgs};
pub use fill::{run_fill, FillArgs};
