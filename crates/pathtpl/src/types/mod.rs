mod result;
mod template;
mod value;

pub use result::TemplateResult;
pub use template::Template;
pub use value::{AsFormattable, Data, Value, ValueKind};
