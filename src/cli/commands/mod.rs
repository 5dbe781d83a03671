//! Subcommands module for the Sitestack CLI.

pub mod apply;
pub mod destroy;
pub mod outputs;
pub mod plan;
pub mod synth;
pub mod validate;

use std::path::{Path, PathBuf};

use crate::cli::output::OutputFormatter;
use sitestack::config::{StackConfig, ToolConfig};
use sitestack::document::StackDocument;
use sitestack::error::Error;
use sitestack::lint;
use sitestack::state::StateStore;
use sitestack::synth::synthesize;

/// Common context shared between commands.
pub struct CommandContext {
    /// Output formatter
    pub output: OutputFormatter,
    /// State snapshot directory
    pub state_dir: PathBuf,
    /// Rendered output directory
    pub out_dir: PathBuf,
    /// Verbosity level
    pub verbosity: u8,
}

impl CommandContext {
    /// Create a new command context from CLI arguments.
    pub fn new(cli: &crate::cli::Cli, tool: ToolConfig) -> Self {
        let use_color = !cli.no_color && tool.colors.enabled;
        let output = OutputFormatter::new(use_color, cli.is_json(), cli.verbosity());
        let state_dir = cli.state_dir.clone().unwrap_or(tool.paths.state_dir);
        let out_dir = cli.out_dir.clone().unwrap_or(tool.paths.out_dir);

        Self {
            output,
            state_dir,
            out_dir,
            verbosity: cli.verbosity(),
        }
    }

    /// The snapshot store for this invocation.
    pub fn store(&self) -> StateStore {
        StateStore::new(&self.state_dir)
    }

    /// Where the rendered document for a stack lands.
    pub fn document_path(&self, stack: &str) -> PathBuf {
        self.out_dir.join(format!("{}.json", stack))
    }

    /// Where the recorded outputs for a stack land.
    pub fn outputs_path(&self, stack: &str) -> PathBuf {
        self.out_dir.join(format!("{}.outputs.json", stack))
    }
}

/// Load a stack definition, synthesize it, and run the policy checks.
pub(crate) fn load_and_synthesize(
    path: &Path,
) -> sitestack::error::Result<(StackConfig, StackDocument)> {
    let config = StackConfig::from_file(path)?;
    let document = synthesize(&config)?;
    lint::enforce(&document, &config.account)?;
    Ok((config, document))
}

/// Render an output value for the console, redacting sensitive values
/// unless explicitly requested.
pub(crate) fn rendered_output(
    value: &sitestack::document::OutputValue,
    show_sensitive: bool,
) -> String {
    if value.sensitive && !show_sensitive {
        sitestack::secrets::SensitiveString::new(value.value.clone()).to_string()
    } else {
        value.value.clone()
    }
}

/// Report an error and map it to the process exit code.
pub(crate) fn report_error(output: &OutputFormatter, err: &Error) -> i32 {
    match err {
        Error::PolicyCheck { violations } => {
            output.error(&err.to_string());
            for violation in violations {
                output.error(&format!("  {}", violation));
            }
        }
        _ => output.error(&err.to_string()),
    }
    err.exit_code()
}
