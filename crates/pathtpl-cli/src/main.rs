//! pathtpl CLI entry point.
//!
//! Provides command-line tools for working with path templates:
//! - `pathtpl fill` - Fill a template with data
//! - `pathtpl check` - List the placeholders of a template

mod commands;
mod output;

use std::io::stderr;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{run_check, run_fill, CheckArgs, FillArgs};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

/// Command-line front end for filling and inspecting path templates.
#[derive(Debug, Parser)]
#[command(name = "pathtpl")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// When to color warnings and unsolved-template reports
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Log data loading and fill progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color mode for the `--color` flag. `Auto` colors only terminals.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fill a template with data
    Fill(FillArgs),
    /// List the placeholders of a template
    Check(CheckArgs),
}

/// Force warning labels and table headers on or off. `Auto` leaves the
/// decision to stream detection in owo-colors.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {}
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Install a stderr log subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG`, only warnings are shown, or info with `--verbose`.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(stderr)
                .with_target(true)
                .with_filter(filter),
        )
        .init();
}

/// Render strict-fill failures with the one-line template as the source and
/// its unresolved placeholders underlined, colored per `--color`.
fn setup_reports(color_when: ColorWhen) -> miette::Result<()> {
    miette::set_hook(Box::new(move |_| {
        let opts = miette::MietteHandlerOpts::new()
            .unicode(true)
            .context_lines(0);
        let opts = match color_when {
            ColorWhen::Auto => opts,
            ColorWhen::Always => opts.color(true),
            ColorWhen::Never => opts.color(false),
        };
        Box::new(opts.build())
    }))?;
    Ok(())
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_logging(cli.verbose);
    setup_reports(cli.color)?;

    let result = match cli.command {
        Commands::Fill(args) => run_fill(args),
        Commands::Check(args) => run_check(args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{:?}", e);
            exit(exitcode::SOFTWARE);
        }
    }
}
