//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};
use serde::Serialize;

/// One placeholder of a compiled template.
#[derive(Debug, Serialize)]
pub struct PlaceholderRow {
    /// The placeholder as written, braces included.
    pub raw: String,
    /// The key looked up in the data (format spec stripped).
    pub lookup_key: String,
    /// The format spec after the `:`, if any.
    pub format_spec: Option<String>,
    /// Number of optional regions enclosing the placeholder.
    pub optional_depth: usize,
}

/// Format placeholders as an ASCII table.
pub fn format_placeholder_table(rows: &[PlaceholderRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Placeholder", "Key", "Format", "Required"]);

    for row in rows {
        table.add_row(vec![
            row.raw.clone(),
            row.lookup_key.clone(),
            row.format_spec.clone().unwrap_or_default(),
            if row.optional_depth == 0 {
                "required".to_string()
            } else {
                format!("optional (depth {})", row.optional_depth)
            },
        ]);
    }

    table
}
