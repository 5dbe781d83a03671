//! Synth command: render the desired-state document.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use super::{load_and_synthesize, rendered_output, report_error, CommandContext};

/// Arguments for the synth command.
#[derive(Parser, Debug, Clone)]
pub struct SynthArgs {
    /// Stack definition file
    #[arg(default_value = "stack.yml")]
    pub stack: PathBuf,
}

impl SynthArgs {
    /// Execute the synth command.
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        ctx.output.banner("SYNTH");

        let (config, document) = match load_and_synthesize(&self.stack) {
            Ok(pair) => pair,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };
        ctx.output
            .debug(&format!("policy checks passed for '{}'", config.stack));

        let rendered = match document.to_json() {
            Ok(r) => r,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };
        std::fs::create_dir_all(&ctx.out_dir)?;
        let path = ctx.document_path(&config.stack);
        std::fs::write(&path, &rendered)?;
        info!(stack = %config.stack, path = %path.display(), "document rendered");

        if ctx.output.is_json() {
            println!("{}", rendered);
            return Ok(0);
        }

        ctx.output.section("Resources");
        for (id, decl) in &document.resources {
            ctx.output.info(&format!("  {:<28} [{}]", id, decl.kind));
        }

        ctx.output.section("Outputs");
        for (name, value) in &document.outputs {
            ctx.output
                .value(name, &rendered_output(value, false), &value.description);
        }

        ctx.output.info(&format!(
            "\nDocument written to {}",
            path.display()
        ));
        Ok(0)
    }
}
