//! Asset sync planning.
//!
//! One idempotent synchronization of the local build output into the
//! bucket, with prune semantics: objects recorded remotely but absent from
//! the local set are deleted, and files matching an exclusion pattern are
//! never uploaded no matter what is on disk. The plan compares content
//! etags, so touching a file without changing it stays a no-op.
//!
//! Planning happens only as part of an apply; the byte transfer itself is
//! executed by the CI runner holding the deployer credentials. Cache
//! invalidation always uses the fixed wildcard scope and is requested only
//! when the plan is dirty.

use serde::{Deserialize, Serialize};
use std::path::Path;

use globset::GlobSet;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::{Error, ErrorContext, Result};
use crate::state::AssetManifest;

/// The invalidation scope used whenever anything changed.
pub const INVALIDATION_SCOPE: &str = "/*";

/// One object to upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncUpload {
    /// Object path relative to the bucket root, `/`-separated
    pub path: String,
    /// Content etag
    pub etag: String,
}

/// A cache invalidation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invalidation {
    /// Invalidated paths; always the fixed wildcard scope
    pub paths: Vec<String>,
    /// Unique caller reference so retries do not double-submit
    pub reference: String,
}

/// The computed sync plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    /// New or changed objects
    pub uploads: Vec<SyncUpload>,
    /// Remote paths absent from the local set
    pub deletions: Vec<String>,
    /// Count of objects left untouched
    pub unchanged: usize,
    /// Requested only when the plan is dirty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalidation: Option<Invalidation>,
}

impl SyncPlan {
    /// True when nothing would be transferred or deleted.
    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty() && self.deletions.is_empty()
    }

    /// The manifest as it will look after the plan runs.
    pub fn applied_manifest(&self, current: &AssetManifest) -> AssetManifest {
        let mut next = current.clone();
        for deletion in &self.deletions {
            next.remove(deletion);
        }
        for upload in &self.uploads {
            next.insert(upload.path.clone(), upload.etag.clone());
        }
        next
    }
}

/// Walk the asset directory and etag every included file.
///
/// Paths are relative to the directory root and `/`-separated regardless of
/// platform. Excluded files are skipped here, which is what keeps them out
/// of uploads entirely.
pub fn scan_assets(dir: &Path, exclude: &GlobSet) -> Result<AssetManifest> {
    if !dir.is_dir() {
        return Err(Error::AssetDirNotFound(dir.to_path_buf()));
    }
    let mut manifest = AssetManifest::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::AssetScan {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| Error::AssetScan {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })?;
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if exclude.is_match(&key) || exclude.is_match(entry.file_name().to_string_lossy().as_ref())
        {
            tracing::debug!(path = %key, "excluded from sync");
            continue;
        }
        let content = std::fs::read(entry.path())
            .with_context(|| format!("reading asset '{}'", key))?;
        manifest.insert(key, format!("{:x}", md5::compute(&content)));
    }
    Ok(manifest)
}

/// Plan the sync from a local manifest against the recorded remote one.
pub fn plan_sync(local: &AssetManifest, remote: &AssetManifest) -> SyncPlan {
    let mut uploads = Vec::new();
    let mut unchanged = 0;
    for (path, etag) in local {
        match remote.get(path) {
            Some(recorded) if recorded == etag => unchanged += 1,
            _ => uploads.push(SyncUpload {
                path: path.clone(),
                etag: etag.clone(),
            }),
        }
    }

    let deletions: Vec<String> = remote
        .keys()
        .filter(|path| !local.contains_key(*path))
        .cloned()
        .collect();

    let invalidation = if uploads.is_empty() && deletions.is_empty() {
        None
    } else {
        Some(Invalidation {
            paths: vec![INVALIDATION_SCOPE.to_string()],
            reference: Uuid::new_v4().to_string(),
        })
    };

    SyncPlan {
        uploads,
        deletions,
        unchanged,
        invalidation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(entries: &[(&str, &str)]) -> AssetManifest {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unchanged_set_plans_nothing_and_skips_invalidation() {
        let local = manifest(&[("index.html", "aa"), ("app.js", "bb")]);
        let plan = plan_sync(&local, &local.clone());
        assert!(plan.is_empty());
        assert_eq!(plan.unchanged, 2);
        assert!(plan.invalidation.is_none());
    }

    #[test]
    fn changed_etag_plans_an_upload() {
        let local = manifest(&[("index.html", "aa")]);
        let remote = manifest(&[("index.html", "old")]);
        let plan = plan_sync(&local, &remote);
        assert_eq!(plan.uploads.len(), 1);
        assert_eq!(plan.uploads[0].path, "index.html");
        let invalidation = plan.invalidation.unwrap();
        assert_eq!(invalidation.paths, vec![INVALIDATION_SCOPE.to_string()]);
    }

    #[test]
    fn remote_only_paths_are_pruned() {
        let local = manifest(&[("index.html", "aa")]);
        let remote = manifest(&[("index.html", "aa"), ("stale.html", "cc")]);
        let plan = plan_sync(&local, &remote);
        assert_eq!(plan.deletions, vec!["stale.html".to_string()]);
        assert!(plan.invalidation.is_some());
    }

    #[test]
    fn applied_manifest_reflects_the_plan() {
        let local = manifest(&[("index.html", "new"), ("fresh.css", "dd")]);
        let remote = manifest(&[("index.html", "old"), ("stale.html", "cc")]);
        let plan = plan_sync(&local, &remote);
        assert_eq!(plan.applied_manifest(&remote), local);
    }
}
