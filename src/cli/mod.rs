//! CLI module for Sitestack.
//!
//! Argument parsing, tool configuration loading, and subcommand handling.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sitestack - declarative static-site infrastructure
///
/// Synthesizes a desired-state document for bucket-and-CDN hosting, plans
/// it against recorded state, and records applies for the external
/// reconciler to execute.
#[derive(Parser, Debug, Clone)]
#[command(name = "sitestack")]
#[command(author = "Sitestack Contributors")]
#[command(version)]
#[command(about = "Declarative static-site infrastructure", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Path to tool configuration file
    #[arg(short = 'c', long, global = true, env = "SITESTACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the state snapshot directory
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Override the rendered output directory
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Synthesize the desired-state document
    Synth(commands::synth::SynthArgs),

    /// Diff the document against recorded state without mutating anything
    Plan(commands::plan::PlanArgs),

    /// Record the document and the asset sync plan as applied
    Apply(commands::apply::ApplyArgs),

    /// Plan whole-stack teardown and drop the recorded state
    Destroy(commands::destroy::DestroyArgs),

    /// Validate the stack definition and its policies
    Validate(commands::validate::ValidateArgs),

    /// Show the outputs recorded by the last apply
    Outputs(commands::outputs::OutputsArgs),
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-4).
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(4)
    }

    /// Whether JSON output was requested.
    pub fn is_json(&self) -> bool {
        self.output == OutputFormat::Json
    }
}
