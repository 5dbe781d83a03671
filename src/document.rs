//! Desired-state document model.
//!
//! A [`StackDocument`] is the single artifact this tool produces: a named
//! stack carrying an ordered set of resource declarations and the output
//! values surfaced after an apply. The document is what the external
//! reconciler consumes; it performs all ordering, diffing against live
//! infrastructure, and mutation. Declaration order is preserved so the same
//! configuration always serializes to the same bytes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{Error, Result};

/// The kind of cloud resource a declaration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// Private object-storage bucket for site assets
    Bucket,
    /// Bucket policy document (TLS enforcement + origin-access grants)
    BucketPolicy,
    /// DNS-validated TLS certificate
    Certificate,
    /// Origin access control binding CDN identities to the bucket origin
    OriginAccessControl,
    /// Content-delivery distribution
    Distribution,
    /// Viewer-request function attached to a distribution
    ViewerFunction,
    /// DNS alias record binding a hostname to a distribution endpoint
    AliasRecord,
    /// CI automation principal with a scoped policy
    CiPrincipal,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Bucket => "bucket",
            ResourceKind::BucketPolicy => "bucket-policy",
            ResourceKind::Certificate => "certificate",
            ResourceKind::OriginAccessControl => "origin-access-control",
            ResourceKind::Distribution => "distribution",
            ResourceKind::ViewerFunction => "viewer-function",
            ResourceKind::AliasRecord => "alias-record",
            ResourceKind::CiPrincipal => "ci-principal",
        };
        write!(f, "{}", s)
    }
}

/// A single resource declaration within a stack.
///
/// `properties` holds the typed resource parameters serialized to JSON; the
/// concrete shapes live in [`crate::resources`]. `references` names other
/// logical ids this declaration depends on. The list is informational: the
/// reconciler derives creation order from it, this tool never does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDeclaration {
    /// Resource kind tag
    pub kind: ResourceKind,
    /// Resource configuration as enumerated in the stack definition
    pub properties: Value,
    /// Logical ids of declarations this one refers to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

/// An output value surfaced for downstream CI steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputValue {
    /// The value (or reference token resolved by the reconciler)
    pub value: String,
    /// Human-readable description
    pub description: String,
    /// Whether the value must be redacted in console output
    #[serde(default)]
    pub sensitive: bool,
}

impl OutputValue {
    /// A plain, freely printable output value.
    pub fn plain(value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: description.into(),
            sensitive: false,
        }
    }

    /// An output value that must be redacted unless explicitly requested.
    pub fn sensitive(value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: description.into(),
            sensitive: true,
        }
    }
}

/// The full desired-state document for one stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackDocument {
    /// Stack name
    pub stack: String,
    /// Resource declarations, keyed by logical id, in declaration order
    pub resources: IndexMap<String, ResourceDeclaration>,
    /// Output values surfaced after apply
    pub outputs: IndexMap<String, OutputValue>,
}

impl StackDocument {
    /// Create an empty document for the named stack.
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            resources: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }

    /// Add a resource declaration.
    ///
    /// Logical ids are unique within a stack; declaring the same id twice is
    /// a synthesis bug, not a recoverable condition for the caller.
    pub fn declare<P: Serialize>(
        &mut self,
        id: impl Into<String>,
        kind: ResourceKind,
        properties: &P,
        references: Vec<String>,
    ) -> Result<()> {
        let id = id.into();
        if self.resources.contains_key(&id) {
            return Err(Error::synthesis(
                self.stack.clone(),
                format!("duplicate logical id '{}'", id),
            ));
        }
        let properties = serde_json::to_value(properties)?;
        self.resources.insert(
            id,
            ResourceDeclaration {
                kind,
                properties,
                references,
            },
        );
        Ok(())
    }

    /// Add an output value.
    pub fn output(&mut self, name: impl Into<String>, value: OutputValue) {
        self.outputs.insert(name.into(), value);
    }

    /// Look up a declaration by logical id.
    pub fn get(&self, id: &str) -> Option<&ResourceDeclaration> {
        self.resources.get(id)
    }

    /// All logical ids of declarations of the given kind, in order.
    pub fn ids_of_kind(&self, kind: ResourceKind) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|(_, decl)| decl.kind == kind)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Render the document as stable, pretty-printed JSON.
    ///
    /// Declaration order is insertion order, so the same configuration
    /// produces byte-identical output across runs.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// SHA-256 fingerprint of the rendered document.
    pub fn fingerprint(&self) -> Result<String> {
        let rendered = self.to_json()?;
        let mut hasher = Sha256::new();
        hasher.update(rendered.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> StackDocument {
        let mut doc = StackDocument::new("site-test");
        doc.declare(
            "SiteBucket",
            ResourceKind::Bucket,
            &json!({"bucket_name": "site-test-assets"}),
            vec![],
        )
        .unwrap();
        doc.output(
            "bucket_name",
            OutputValue::plain("site-test-assets", "Asset bucket"),
        );
        doc
    }

    #[test]
    fn duplicate_logical_id_is_rejected() {
        let mut doc = sample();
        let err = doc
            .declare(
                "SiteBucket",
                ResourceKind::Bucket,
                &json!({}),
                vec![],
            )
            .unwrap_err();
        assert!(err.to_string().contains("duplicate logical id"));
    }

    #[test]
    fn rendering_is_stable() {
        let a = sample().to_json().unwrap();
        let b = sample().to_json().unwrap();
        assert_eq!(a, b);
        assert_eq!(
            sample().fingerprint().unwrap(),
            sample().fingerprint().unwrap()
        );
    }

    #[test]
    fn fingerprint_tracks_content() {
        let base = sample().fingerprint().unwrap();
        let mut changed = sample();
        changed
            .declare("Extra", ResourceKind::Certificate, &json!({}), vec![])
            .unwrap();
        assert_ne!(base, changed.fingerprint().unwrap());
    }
}
