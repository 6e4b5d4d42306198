//! Command-line interface for seer.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::analysis::{self, MethodKeying, WalkOptions};
use crate::report::{self, ReportOptions};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Explore a Go source tree and report every function it declares.
///
/// For each function or method seer prints its documentation, receiver,
/// signature and the local variables assigned in its body.
#[derive(Parser, Debug)]
#[command(name = "seer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to analyze
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
    pub format: Format,

    /// Glob (relative to DIR) of files to skip; may be repeated
    #[arg(short, long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Skip `_test.go` files
    #[arg(long)]
    pub skip_tests: bool,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub follow_links: bool,

    /// Key methods by receiver type so same-named methods stay distinct
    #[arg(long)]
    pub qualify_methods: bool,

    /// Summarize each top-level statement of every function body
    #[arg(long)]
    pub statements: bool,

    /// Log every analyzed file to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pretty,
    Json,
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "seer=debug" } else { "seer=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(e) = installed {
        // Already installed (e.g. by a test harness); keep the existing one.
        tracing::debug!(error = %e, "log subscriber not replaced");
    }
}

impl Cli {
    /// Translate flags into walk options.
    pub fn walk_options(&self) -> anyhow::Result<WalkOptions> {
        let keying = if self.qualify_methods {
            MethodKeying::Receiver
        } else {
            MethodKeying::Name
        };
        let options = WalkOptions::new()
            .exclude(self.exclude.as_slice())?
            .include_tests(!self.skip_tests)
            .follow_links(self.follow_links)
            .keying(keying);
        Ok(options)
    }
}

/// Run the analysis and print the report.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let options = cli.walk_options()?;
    let summary = analysis::walk(&cli.dir, &options)?;

    let report_options = ReportOptions {
        statements: cli.statements,
    };
    let path = cli.dir.to_string_lossy().to_string();

    match cli.format {
        Format::Json => report::write_json(&path, &summary, report_options)?,
        Format::Pretty => report::write_pretty(&summary, report_options)?,
    }

    Ok(EXIT_SUCCESS)
}
