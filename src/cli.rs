// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `sitewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sitewatch",
    version,
    about = "Watch a site's sources and rebuild changed pages incrementally.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the options file (TOML).
    ///
    /// Default: `SiteWatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "SiteWatch.toml")]
    pub config: String,

    /// Build the site once and exit, no watching.
    #[arg(long)]
    pub once: bool,

    /// Serve the rendered site over HTTP while watching.
    #[arg(long)]
    pub serve: bool,

    /// Include draft content in generated output.
    #[arg(long)]
    pub drafts: bool,

    /// Include future-dated content in generated output.
    #[arg(long)]
    pub future: bool,

    /// Suppress informational messages and generator output.
    #[arg(long)]
    pub silent: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SITEWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve configuration, print the derived watch scope, and exit.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
