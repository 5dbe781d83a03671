//! Sitestack - declarative static-site infrastructure
//!
//! This is the main entry point for the Sitestack CLI.

mod cli;

use anyhow::Result;
use cli::commands::CommandContext;
use cli::{Cli, Commands};
use sitestack::config::ToolConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application version information
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load tool configuration
    let config = ToolConfig::load(cli.config.as_ref()).unwrap_or_else(|e| {
        if cli.verbosity() >= 1 {
            eprintln!("Warning: Failed to load config: {}", e);
        }
        ToolConfig::default()
    });

    // Initialize logging based on verbosity
    init_logging(cli.verbosity(), &config.logging.level);

    // Display version if verbose
    if cli.verbosity() >= 2 {
        eprintln!("Sitestack v{} by {}", VERSION, AUTHORS);
    }

    // Create command context
    let mut ctx = CommandContext::new(&cli, config);

    // Execute the appropriate command
    let exit_code = match &cli.command {
        Commands::Synth(args) => args.execute(&mut ctx)?,
        Commands::Plan(args) => args.execute(&mut ctx)?,
        Commands::Apply(args) => args.execute(&mut ctx)?,
        Commands::Destroy(args) => args.execute(&mut ctx)?,
        Commands::Validate(args) => args.execute(&mut ctx)?,
        Commands::Outputs(args) => args.execute(&mut ctx)?,
    };

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8, default_level: &str) {
    let filter = match verbosity {
        0 => default_level,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbosity >= 3))
        .with(env_filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
