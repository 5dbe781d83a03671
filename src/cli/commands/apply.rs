//! Apply command: record the document and plan the asset sync.
//!
//! Apply is the only place the asset sync is planned (it is a side effect
//! of a successful apply, never a standalone action) and the only command
//! that writes state.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use super::{load_and_synthesize, rendered_output, report_error, CommandContext};
use sitestack::state::{diff_documents, StackSnapshot};
use sitestack::sync::{plan_sync, scan_assets};

/// Arguments for the apply command.
#[derive(Parser, Debug, Clone)]
pub struct ApplyArgs {
    /// Stack definition file
    #[arg(default_value = "stack.yml")]
    pub stack: PathBuf,
}

impl ApplyArgs {
    /// Execute the apply command.
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        ctx.output.banner("APPLY");

        let (config, document) = match load_and_synthesize(&self.stack) {
            Ok(pair) => pair,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };

        let store = ctx.store();
        let snapshot = match store.load(&config.stack) {
            Ok(s) => s,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };
        let recorded = snapshot.as_ref().map(|s| &s.document);
        let plan = match diff_documents(&document, recorded) {
            Ok(p) => p,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };

        ctx.output.section("Resource changes");
        for change in &plan.changes {
            ctx.output.change(
                change.change,
                &change.kind.to_string(),
                &change.id,
                change.detail.as_deref(),
            );
        }
        ctx.output.info(&plan.summary().to_string());

        // Asset sync rides on the apply: prune what is gone, skip what is
        // excluded, invalidate only when dirty.
        let excludes = match config.assets.exclude_globs() {
            Ok(g) => g,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };
        let local = match scan_assets(&config.assets.dir, &excludes) {
            Ok(m) => m,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };
        let remote = snapshot
            .as_ref()
            .map(|s| s.asset_manifest.clone())
            .unwrap_or_default();
        let sync_plan = plan_sync(&local, &remote);

        ctx.output.section("Asset sync");
        ctx.output.info(&format!(
            "{} to upload, {} to delete, {} unchanged",
            sync_plan.uploads.len(),
            sync_plan.deletions.len(),
            sync_plan.unchanged
        ));
        if ctx.verbosity >= 1 {
            for upload in &sync_plan.uploads {
                ctx.output.info(&format!("  upload {}", upload.path));
            }
            for deletion in &sync_plan.deletions {
                ctx.output.info(&format!("  delete {}", deletion));
            }
        }
        match &sync_plan.invalidation {
            Some(invalidation) => ctx.output.info(&format!(
                "cache invalidation on {}",
                invalidation.paths.join(", ")
            )),
            None => ctx.output.info("no cache invalidation needed"),
        }

        let new_manifest = sync_plan.applied_manifest(&remote);
        let new_snapshot = match StackSnapshot::record(document.clone(), new_manifest) {
            Ok(s) => s,
            Err(e) => return Ok(report_error(&ctx.output, &e)),
        };
        if let Err(e) = store.save(&new_snapshot) {
            return Ok(report_error(&ctx.output, &e));
        }
        info!(stack = %config.stack, fingerprint = %new_snapshot.fingerprint, "state recorded");

        std::fs::create_dir_all(&ctx.out_dir)?;
        let document_path = ctx.document_path(&config.stack);
        std::fs::write(&document_path, document.to_json().map_err(anyhow::Error::from)?)?;
        let outputs_path = ctx.outputs_path(&config.stack);
        std::fs::write(
            &outputs_path,
            serde_json::to_string_pretty(&document.outputs)?,
        )?;

        if ctx.output.is_json() {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "plan": plan,
                    "sync": sync_plan,
                    "fingerprint": new_snapshot.fingerprint,
                }))?
            );
            return Ok(0);
        }

        ctx.output.section("Outputs");
        for (name, value) in &document.outputs {
            ctx.output
                .value(name, &rendered_output(value, false), &value.description);
        }
        ctx.output.info(&format!(
            "\nDocument written to {}; outputs written to {}",
            document_path.display(),
            outputs_path.display()
        ));
        Ok(0)
    }
}
