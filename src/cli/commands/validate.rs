//! Validate command: definition and policy checks only.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use super::{load_and_synthesize, report_error, CommandContext};

/// Arguments for the validate command.
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Stack definition file
    #[arg(default_value = "stack.yml")]
    pub stack: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command.
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        ctx.output.banner("VALIDATE");

        match load_and_synthesize(&self.stack) {
            Ok((config, document)) => {
                ctx.output.info(&format!(
                    "stack '{}' is valid: {} resource declarations, no policy violations",
                    config.stack,
                    document.resources.len()
                ));
                Ok(0)
            }
            Err(e) => Ok(report_error(&ctx.output, &e)),
        }
    }
}
