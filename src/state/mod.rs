//! Recorded stack state.
//!
//! After a successful apply the desired-state document and the asset
//! manifest are recorded as a snapshot. The plan engine diffs the next
//! synthesis against the snapshot: an unchanged definition plans to an
//! all-NoOp result, which is the idempotence contract the rest of the tool
//! leans on. Snapshots are plain JSON files written atomically.

pub mod diff;
pub mod persistence;

pub use diff::{destroy_plan, diff_documents, ChangeKind, Plan, PlanSummary, ResourceChange};
pub use persistence::StateStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::document::StackDocument;
use crate::error::Result;

/// Asset manifest: relative object path to content etag.
pub type AssetManifest = BTreeMap<String, String>;

/// The recorded state of one stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSnapshot {
    /// Stack name
    pub stack: String,
    /// Fingerprint of the recorded document
    pub fingerprint: String,
    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
    /// The document as applied
    pub document: StackDocument,
    /// Objects recorded in the bucket after the last sync
    #[serde(default)]
    pub asset_manifest: AssetManifest,
}

impl StackSnapshot {
    /// Record a freshly applied document and manifest.
    pub fn record(document: StackDocument, asset_manifest: AssetManifest) -> Result<Self> {
        let fingerprint = document.fingerprint()?;
        Ok(Self {
            stack: document.stack.clone(),
            fingerprint,
            taken_at: Utc::now(),
            document,
            asset_manifest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StackDocument;

    #[test]
    fn record_fingerprints_the_document() {
        let doc = StackDocument::new("site-test");
        let snapshot = StackSnapshot::record(doc.clone(), AssetManifest::new()).unwrap();
        assert_eq!(snapshot.stack, "site-test");
        assert_eq!(snapshot.fingerprint, doc.fingerprint().unwrap());
    }
}
