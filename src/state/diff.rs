//! Plan engine: desired document vs recorded snapshot.
//!
//! The diff is by logical id over the serialized properties. It reports
//! what the reconciler is going to be asked to do; it neither orders nor
//! executes anything.

use serde::{Deserialize, Serialize};
use similar::TextDiff;
use std::collections::HashSet;
use std::fmt;

use crate::document::{ResourceKind, StackDocument};
use crate::error::Result;
use crate::resources::bucket::{BucketDeclaration, DeletionPolicy};

/// What happens to one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Declared but not recorded
    Create,
    /// Recorded with different properties
    Update,
    /// Recorded but no longer declared
    Delete,
    /// Recorded and unchanged
    NoOp,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Create => write!(f, "create"),
            ChangeKind::Update => write!(f, "update"),
            ChangeKind::Delete => write!(f, "delete"),
            ChangeKind::NoOp => write!(f, "no-op"),
        }
    }
}

/// One planned change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Logical id
    pub id: String,
    /// Resource kind
    pub kind: ResourceKind,
    /// Planned change
    pub change: ChangeKind,
    /// Unified diff of properties, for updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The full plan for one stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Stack name
    pub stack: String,
    /// Planned changes, desired-document order first, deletions last
    pub changes: Vec<ResourceChange>,
}

impl Plan {
    /// True when anything would change.
    pub fn has_changes(&self) -> bool {
        self.changes
            .iter()
            .any(|c| c.change != ChangeKind::NoOp)
    }

    /// Counts per change kind.
    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for change in &self.changes {
            match change.change {
                ChangeKind::Create => summary.create += 1,
                ChangeKind::Update => summary.update += 1,
                ChangeKind::Delete => summary.delete += 1,
                ChangeKind::NoOp => summary.unchanged += 1,
            }
        }
        summary
    }
}

/// Plan totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub unchanged: usize,
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete, {} unchanged",
            self.create, self.update, self.delete, self.unchanged
        )
    }
}

/// Diff a desired document against the recorded one.
pub fn diff_documents(desired: &StackDocument, recorded: Option<&StackDocument>) -> Result<Plan> {
    let mut changes = Vec::new();

    for (id, decl) in &desired.resources {
        let change = match recorded.and_then(|r| r.get(id)) {
            None => ResourceChange {
                id: id.clone(),
                kind: decl.kind,
                change: ChangeKind::Create,
                detail: None,
            },
            Some(old) if old.properties == decl.properties && old.kind == decl.kind => {
                ResourceChange {
                    id: id.clone(),
                    kind: decl.kind,
                    change: ChangeKind::NoOp,
                    detail: None,
                }
            }
            Some(old) => ResourceChange {
                id: id.clone(),
                kind: decl.kind,
                change: ChangeKind::Update,
                detail: Some(properties_diff(&old.properties, &decl.properties)?),
            },
        };
        changes.push(change);
    }

    if let Some(recorded) = recorded {
        let desired_ids: HashSet<&String> = desired.resources.keys().collect();
        for (id, decl) in &recorded.resources {
            if !desired_ids.contains(id) {
                changes.push(ResourceChange {
                    id: id.clone(),
                    kind: decl.kind,
                    change: ChangeKind::Delete,
                    detail: None,
                });
            }
        }
    }

    Ok(Plan {
        stack: desired.stack.clone(),
        changes,
    })
}

/// Whole-stack teardown plan.
///
/// Every recorded declaration becomes a delete, except stateful resources
/// whose deletion policy says retain: those stay behind and are reported as
/// unchanged with a note.
pub fn destroy_plan(recorded: &StackDocument) -> Plan {
    let changes = recorded
        .resources
        .iter()
        .map(|(id, decl)| {
            if decl.kind == ResourceKind::Bucket && is_retained(decl.properties.clone()) {
                ResourceChange {
                    id: id.clone(),
                    kind: decl.kind,
                    change: ChangeKind::NoOp,
                    detail: Some("retained by deletion policy".to_string()),
                }
            } else {
                ResourceChange {
                    id: id.clone(),
                    kind: decl.kind,
                    change: ChangeKind::Delete,
                    detail: None,
                }
            }
        })
        .collect();

    Plan {
        stack: recorded.stack.clone(),
        changes,
    }
}

fn is_retained(properties: serde_json::Value) -> bool {
    serde_json::from_value::<BucketDeclaration>(properties)
        .map(|b| b.deletion_policy == DeletionPolicy::Retain)
        .unwrap_or(false)
}

fn properties_diff(
    recorded: &serde_json::Value,
    desired: &serde_json::Value,
) -> Result<String> {
    let before = serde_json::to_string_pretty(recorded)?;
    let after = serde_json::to_string_pretty(desired)?;
    Ok(TextDiff::from_lines(&before, &after)
        .unified_diff()
        .header("recorded", "desired")
        .to_string())
}
