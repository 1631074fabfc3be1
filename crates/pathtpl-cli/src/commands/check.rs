//! Implementation of the `pathtpl check` command.

use owo_colors::{OwoColorize, Stream};
use pathtpl::Template;
use serde::Serialize;

use crate::output::{format_placeholder_table, PlaceholderRow};

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Template to inspect
    pub template: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for check results.
#[derive(Serialize)]
pub struct CheckReport {
    pub template: String,
    pub placeholders: Vec<PlaceholderRow>,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let template = Template::compile(args.template);
    let rows: Vec<PlaceholderRow> = template
        .placeholders()
        .into_iter()
        .map(|(depth, placeholder)| PlaceholderRow {
            raw: placeholder.raw.clone(),
            lookup_key: placeholder.lookup_key().to_string(),
            format_spec: placeholder.format_spec().map(str::to_string),
            optional_depth: depth,
        })
        .collect();

    if args.json {
        let report = CheckReport {
            template: template.as_str().to_string(),
            placeholders: rows,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| miette::miette!("Failed to serialize report: {}", e))?;
        println!("{}", json);
        return Ok(exitcode::OK);
    }

    if rows.is_empty() {
        println!(
            "{}",
            "No placeholders".if_supports_color(Stream::Stdout, |text| text.dimmed())
        );
        return Ok(exitcode::OK);
    }

    let optional = rows.iter().filter(|row| row.optional_depth > 0).count();
    println!("{}", format_placeholder_table(&rows));
    println!(
        "{} placeholders ({} required, {} optional)",
        rows.len().if_supports_color(Stream::Stdout, |n| n.bold()),
        rows.len() - optional,
        optional
    );
    Ok(exitcode::OK)
}
