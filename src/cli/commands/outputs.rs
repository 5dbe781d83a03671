//! Outputs command: show what the last apply recorded.

use anyhow::Result;
use clap::Parser;
use indexmap::IndexMap;
use std::path::PathBuf;

use super::{rendered_output, report_error, CommandContext};
use sitestack::config::StackConfig;
use sitestack::document::OutputValue;
use sitestack::error::Error;

/// Arguments for the outputs command.
#[derive(Parser, Debug, Clone)]
pub struct OutputsArgs {
    /// Stack definition file
    #[arg(default_value = "stack.yml")]
    pub stack: PathBuf,

    /// Print sensitive values instead of redacting them
    #[arg(long)]
    pub show_sensitive: bool,
}

impl OutputsArgs {
    /// Execute the outputs command.
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let config = match StackConfig::from_file(&self.stack) {
            Ok(c) => c,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };

        let path = ctx.outputs_path(&config.stack);
        if !path.exists() {
            return Ok(report_error(&ctx.output, &Error::OutputsNotFound(path)));
        }
        let content = std::fs::read_to_string(&path)?;
        let outputs: IndexMap<String, OutputValue> = serde_json::from_str(&content)?;

        if ctx.output.is_json() {
            println!("{}", content.trim_end());
            return Ok(0);
        }

        ctx.output.banner("OUTPUTS");
        for (name, value) in &outputs {
            ctx.output.value(
                name,
                &rendered_output(value, self.show_sensitive),
                &value.description,
            );
        }
        Ok(0)
    }
}
