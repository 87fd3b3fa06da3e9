//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Convert an Alipay mini-program project into Vue single-file components
#[derive(Parser, Debug, Clone)]
#[command(name = "axml2vue")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Mini-program project directory to convert
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory to write the converted project to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Ignore patterns (glob, relative to the input directory)
    #[arg(long, value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Do not write declare.d.ts at the output root
    #[arg(long)]
    pub no_declarations: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Show timing information
    #[arg(long)]
    pub timings: bool,
}

/// Output format for progress and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// Human-readable with every converted and copied file listed
    HumanVerbose,
    /// Newline-delimited JSON events
    Json,
    /// Colon-separated records
    Machine,
}

impl Args {
    /// Check if output should be verbose.
    pub fn is_verbose(&self) -> bool {
        self.verbose || matches!(self.format, OutputFormat::HumanVerbose)
    }
}
