//! Plan command: diff-only, never mutates state.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use super::{load_and_synthesize, report_error, CommandContext};
use sitestack::state::diff_documents;

/// Exit code when the plan contains pending changes.
pub const EXIT_CHANGES_PENDING: i32 = 2;

/// Arguments for the plan command.
#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    /// Stack definition file
    #[arg(default_value = "stack.yml")]
    pub stack: PathBuf,
}

impl PlanArgs {
    /// Execute the plan command.
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        ctx.output.banner("PLAN");

        let (config, document) = match load_and_synthesize(&self.stack) {
            Ok(pair) => pair,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };

        let snapshot = match ctx.store().load(&config.stack) {
            Ok(s) => s,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };
        if snapshot.is_none() {
            debug!(stack = %config.stack, "no recorded state; everything plans as create");
        }
        let recorded = snapshot.as_ref().map(|s| &s.document);
        let plan = match diff_documents(&document, recorded) {
            Ok(p) => p,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };

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

        if plan.has_changes() {
            Ok(EXIT_CHANGES_PENDING)
        } else {
            Ok(0)
        }
    }
}
