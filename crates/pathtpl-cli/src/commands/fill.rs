//! Implementation of the `pathtpl fill` command.

use std::fs::read_to_string;
use std::io;
use std::path::{Path, PathBuf};

use miette::Report;
use owo_colors::{OwoColorize, Stream};
use pathtpl::parser::insert_nested;
use pathtpl::{Data, Template, TemplateResult, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::output::UnsolvedDiagnostic;

/// Arguments for the fill command.
#[derive(Debug, clap::Args)]
pub struct FillArgs {
    /// Template string to fill
    pub template: String,

    /// JSON file with fill data (an object at the top level)
    #[arg(long, env = "PATHTPL_DATA")]
    pub data: Option<PathBuf>,

    /// Values in key=value format (repeatable); keys may be nested, e.g. project[code]=dm
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Fail if any required placeholder is unresolved
    #[arg(long)]
    pub strict: bool,

    /// Normalize the output as a filesystem path
    #[arg(long)]
    pub normalize: bool,

    /// Output as JSON, with all diagnostics
    #[arg(long)]
    pub json: bool,
}

/// An error loading the data file.
#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("cannot read data file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid data file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl DataFileError {
    fn exit_code(&self) -> i32 {
        match self {
            DataFileError::Read { .. } => exitcode::NOINPUT,
            DataFileError::Parse { .. } => exitcode::DATAERR,
        }
    }
}

/// Parse a key=value parameter string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid parameter format '{}': expected key=value", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Read fill data from a JSON file.
fn load_data(path: &Path) -> Result<Data, DataFileError> {
    let content = read_to_string(path).map_err(|source| DataFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DataFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Run the fill command.
pub fn run_fill(args: FillArgs) -> miette::Result<i32> {
    let mut data = match &args.data {
        Some(path) => match load_data(path) {
            Ok(data) => {
                info!(path = %path.display(), keys = data.len(), "loaded data file");
                data
            }
            Err(e) => {
                let label = "error:".if_supports_color(Stream::Stderr, |text| text.red());
                eprintln!("{} {}", label, e);
                return Ok(e.exit_code());
            }
        },
        None => Data::new(),
    };

    for (key, raw) in args.params {
        // Try parsing as i64 first, fall back to String
        let value = if let Ok(n) = raw.parse::<i64>() {
            Value::from(n)
        } else {
            Value::from(raw)
        };
        debug!(key = %key, %value, "parameter override");
        insert_nested(&mut data, &key, value);
    }

    let template = Template::compile(args.template);
    let mut result = template.format(&data);
    if args.normalize {
        result = result.normalized();
    }

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| miette::miette!("Failed to serialize result: {}", e))?;
        println!("{}", json);
        return Ok(if args.strict && !result.solved() {
            exitcode::DATAERR
        } else {
            exitcode::OK
        });
    }

    match result.validate() {
        Ok(()) => {
            println!("{}", result);
            Ok(exitcode::OK)
        }
        Err(err) if args.strict => {
            let diagnostic = UnsolvedDiagnostic::new(&template, &result, &err);
            eprintln!("{:?}", Report::new(diagnostic));
            Ok(exitcode::DATAERR)
        }
        Err(_) => {
            print_warnings(&result);
            println!("{}", result);
            Ok(exitcode::OK)
        }
    }
}

/// List the unresolved keys of a non-strict fill on stderr.
fn print_warnings(result: &TemplateResult) {
    let label = "warning:".if_supports_color(Stream::Stderr, |text| text.yellow());
    for key in result.missing_keys() {
        match result.suggestions().get(key) {
            Some(candidates) => eprintln!(
                "{} missing key `{}` (did you mean `{}`?)",
                label,
                key,
                candidates.join("`, `")
            ),
            None => eprintln!("{} missing key `{}`", label, key),
        }
    }
    for (key, kind) in result.invalid_types() {
        eprintln!(
            "{} key `{}` has invalid data type {}",
            label,
            key,
            kind
        );
    }
}
