//! Compiled string templates with optional regions and fill diagnostics.
//!
//! A template mixes literal text, `{key}` placeholders and `<...>` optional
//! regions:
//!
//! - `{name}` substitutes a value from the data
//! - `{project[code]}` follows nested mappings
//! - `{version:0>3}` applies a format spec to the value
//! - `<_{task}>` is dropped entirely when anything inside it is unresolved
//!
//! Filling never fails. The returned [`TemplateResult`] carries the output
//! with unresolved placeholders left as written, plus the missing keys and
//! invalid value types; [`TemplateResult::validate`] or the strict entry
//! points turn an unsolved fill into a [`TemplateUnsolved`] error.
//!
//! ```
//! use pathtpl::{compile, data};
//!
//! let template = compile("{root}/{project[code]}<_{task}>_v{version:0>3}.ma");
//! let result = template.format(&data! {
//!     "root" => "/mnt/work",
//!     "project" => data! { "code" => "dm" },
//!     "version" => 12,
//! });
//!
//! assert!(result.solved());
//! assert_eq!(result, "/mnt/work/dm_v012.ma");
//! ```

pub mod interpreter;
pub mod parser;
pub mod types;

pub use interpreter::{TemplateUnsolved, compute_suggestions};
pub use parser::{CompileError, Part, Placeholder};
pub use types::{AsFormattable, Data, Template, TemplateResult, Value, ValueKind};

/// Compile a template string.
pub fn compile(template: &str) -> Template {
    Template::compile(template)
}

/// Compile `template` and fill it with `data` in one step.
pub fn format_template(template: &str, data: &Data) -> TemplateResult {
    Template::compile(template).format(data)
}

/// Compile `template` and fill it with `data`, failing if it is unsolved.
///
/// # Errors
///
/// Returns [`TemplateUnsolved`] if any required placeholder is unresolved.
pub fn format_strict_template(
    template: &str,
    data: &Data,
) -> Result<TemplateResult, TemplateUnsolved> {
    Template::compile(template).format_strict(data)
}

/// Creates a [`Data`] map from key-value pairs.
///
/// Values are converted via `Into<Value>`, so integers, floats, strings,
/// booleans and nested `data!` maps can be passed directly.
///
/// # Example
///
/// ```
/// use pathtpl::data;
///
/// let d = data! { "version" => 3, "project" => data! { "name" => "demo" } };
/// assert_eq!(d.len(), 2);
/// assert_eq!(d["version"].as_number(), Some(3));
/// ```
#[macro_export]
macro_rules! data {
    {} => {
        $crate::Data::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = $crate::Data::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
