//! Destroy command: whole-stack teardown.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use super::{report_error, CommandContext};
use sitestack::config::StackConfig;
use sitestack::state::destroy_plan;

/// Arguments for the destroy command.
#[derive(Parser, Debug, Clone)]
pub struct DestroyArgs {
    /// Stack definition file
    #[arg(default_value = "stack.yml")]
    pub stack: PathBuf,

    /// Confirm the teardown
    #[arg(long)]
    pub yes: bool,
}

impl DestroyArgs {
    /// Execute the destroy command.
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        ctx.output.banner("DESTROY");

        let config = match StackConfig::from_file(&self.stack) {
            Ok(c) => c,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };

        if !self.yes {
            ctx.output
                .warning("refusing to destroy without --yes");
            return Ok(1);
        }

        let store = ctx.store();
        let snapshot = match store.load(&config.stack) {
            Ok(s) => s,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };
        let Some(snapshot) = snapshot else {
            ctx.output
                .info(&format!("nothing to destroy for stack '{}'", config.stack));
            return Ok(0);
        };

        let plan = destroy_plan(&snapshot.document);
        if ctx.output.is_json() {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            for change in &plan.changes {
                ctx.output.change(
                    change.change,
                    &change.kind.to_string(),
                    &change.id,
                    change.detail.as_deref(),
                );
            }
            ctx.output.section("Summary");
            ctx.output.info(&plan.summary().to_string());
        }

        if let Err(e) = store.remove(&config.stack) {
            return Ok(report_error(&ctx.output, &e));
        }
        let outputs_path = ctx.outputs_path(&config.stack);
        if outputs_path.exists() {
            std::fs::remove_file(&outputs_path)?;
        }
        info!(stack = %config.stack, "recorded state removed");

        Ok(0)
    }
}
