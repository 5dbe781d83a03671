//! Policy checks over a synthesized document.
//!
//! The reconciler would happily apply a wildcard grant or a half-open
//! public-access block; these rules encode the stricter contract this stack
//! is designed around and fail the run synchronously instead. Checks run on
//! the document, not the configuration, so anything synthesis produces is
//! covered regardless of how it was assembled.
//!
//! Rules:
//! - the bucket blocks all four public-access dimensions together and
//!   enforces TLS-only transport;
//! - the certificate lives in the CDN-compatible region and covers every
//!   hostname any distribution binds;
//! - a distribution carrying a viewer function (the redirecting alias)
//!   must have caching disabled;
//! - every policy statement's resources are a strict subset of this
//!   stack's own ARNs, and allow-statements enumerate exact actions;
//! - declaration references resolve within the stack.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{ResourceKind, StackDocument};
use crate::error::{Error, Result};
use crate::resources::bucket::BucketDeclaration;
use crate::resources::certificate::{CertificateDeclaration, CERTIFICATE_REGION};
use crate::resources::distribution::DistributionDeclaration;
use crate::resources::iam::{BucketPolicyDeclaration, CiPrincipalDeclaration, Effect, PolicyStatement};
use crate::resources::{bucket_arn, bucket_objects_arn, distribution_arn};

/// One violated rule, anchored to the offending declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyViolation {
    /// Logical id of the offending declaration
    pub resource: String,
    /// What rule was broken
    pub message: String,
}

impl PolicyViolation {
    fn new(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.resource, self.message)
    }
}

/// Run every check; empty result means the document is clean.
pub fn check_document(doc: &StackDocument, account: &str) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();

    check_references(doc, &mut violations);

    let bucket_name = check_bucket(doc, &mut violations);
    let distribution_ids = doc.ids_of_kind(ResourceKind::Distribution);
    check_certificate(doc, &distribution_ids, &mut violations);
    check_distributions(doc, &distribution_ids, &mut violations);

    if let Some(bucket_name) = bucket_name {
        let allowed = allowed_resources(&bucket_name, account, &distribution_ids);
        check_statements(doc, &allowed, &mut violations);
    }

    violations
}

/// Like [`check_document`], but converts violations into an error.
pub fn enforce(doc: &StackDocument, account: &str) -> Result<()> {
    let violations = check_document(doc, account);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::PolicyCheck { violations })
    }
}

fn check_references(doc: &StackDocument, violations: &mut Vec<PolicyViolation>) {
    for (id, decl) in &doc.resources {
        for reference in &decl.references {
            if !doc.resources.contains_key(reference) {
                violations.push(PolicyViolation::new(
                    id.clone(),
                    format!("references undeclared resource '{}'", reference),
                ));
            }
        }
    }
}

fn check_bucket(doc: &StackDocument, violations: &mut Vec<PolicyViolation>) -> Option<String> {
    let buckets = doc.ids_of_kind(ResourceKind::Bucket);
    if buckets.len() != 1 {
        violations.push(PolicyViolation::new(
            doc.stack.clone(),
            format!("expected exactly one bucket, found {}", buckets.len()),
        ));
        return None;
    }
    let id = buckets[0];
    let decl = doc.get(id)?;
    let bucket: BucketDeclaration = match serde_json::from_value(decl.properties.clone()) {
        Ok(b) => b,
        Err(e) => {
            violations.push(PolicyViolation::new(id, format!("malformed properties: {}", e)));
            return None;
        }
    };
    if !bucket.access_block.denies_all() {
        violations.push(PolicyViolation::new(
            id,
            "public-access block must deny all four dimensions together",
        ));
    }
    if !bucket.enforce_tls {
        violations.push(PolicyViolation::new(id, "bucket must enforce TLS-only transport"));
    }
    Some(bucket.bucket_name)
}

fn check_certificate(
    doc: &StackDocument,
    distribution_ids: &[&str],
    violations: &mut Vec<PolicyViolation>,
) {
    let certificates = doc.ids_of_kind(ResourceKind::Certificate);
    if certificates.len() != 1 {
        violations.push(PolicyViolation::new(
            doc.stack.clone(),
            format!("expected exactly one certificate, found {}", certificates.len()),
        ));
        return;
    }
    let id = certificates[0];
    let Some(decl) = doc.get(id) else { return };
    let cert: CertificateDeclaration = match serde_json::from_value(decl.properties.clone()) {
        Ok(c) => c,
        Err(e) => {
            violations.push(PolicyViolation::new(id, format!("malformed properties: {}", e)));
            return;
        }
    };
    if cert.region != CERTIFICATE_REGION {
        violations.push(PolicyViolation::new(
            id,
            format!(
                "certificate must be issued in {}, found {}",
                CERTIFICATE_REGION, cert.region
            ),
        ));
    }
    // Every bound hostname must appear on the certificate, including the
    // alias hostname that only ever answers with redirects.
    let covered: HashSet<&str> = cert.covered_hostnames().into_iter().collect();
    for dist_id in distribution_ids {
        let Some(dist_decl) = doc.get(dist_id) else { continue };
        let Ok(dist) =
            serde_json::from_value::<DistributionDeclaration>(dist_decl.properties.clone())
        else {
            continue;
        };
        for alias in &dist.aliases {
            if !covered.contains(alias.as_str()) {
                violations.push(PolicyViolation::new(
                    *dist_id,
                    format!("bound hostname '{}' is not covered by the certificate", alias),
                ));
            }
        }
    }
}

fn check_distributions(
    doc: &StackDocument,
    distribution_ids: &[&str],
    violations: &mut Vec<PolicyViolation>,
) {
    for id in distribution_ids {
        let Some(decl) = doc.get(id) else { continue };
        let dist: DistributionDeclaration = match serde_json::from_value(decl.properties.clone()) {
            Ok(d) => d,
            Err(e) => {
                violations.push(PolicyViolation::new(*id, format!("malformed properties: {}", e)));
                continue;
            }
        };
        if dist.viewer_function.is_some() && !dist.cache.is_disabled() {
            violations.push(PolicyViolation::new(
                *id,
                "redirecting distribution must disable caching",
            ));
        }
        if dist.aliases.is_empty() {
            violations.push(PolicyViolation::new(*id, "distribution binds no hostnames"));
        }
    }
}

fn allowed_resources(
    bucket_name: &str,
    account: &str,
    distribution_ids: &[&str],
) -> HashSet<String> {
    let mut allowed = HashSet::new();
    allowed.insert(bucket_arn(bucket_name));
    allowed.insert(bucket_objects_arn(bucket_name));
    for id in distribution_ids {
        allowed.insert(distribution_arn(account, id));
    }
    allowed
}

fn check_statements(
    doc: &StackDocument,
    allowed: &HashSet<String>,
    violations: &mut Vec<PolicyViolation>,
) {
    for (id, decl) in &doc.resources {
        let statements: Vec<PolicyStatement> = match decl.kind {
            ResourceKind::BucketPolicy => {
                match serde_json::from_value::<BucketPolicyDeclaration>(decl.properties.clone()) {
                    Ok(p) => p.statements,
                    Err(e) => {
                        violations.push(PolicyViolation::new(
                            id.clone(),
                            format!("malformed properties: {}", e),
                        ));
                        continue;
                    }
                }
            }
            ResourceKind::CiPrincipal => {
                match serde_json::from_value::<CiPrincipalDeclaration>(decl.properties.clone()) {
                    Ok(p) => p.statements,
                    Err(e) => {
                        violations.push(PolicyViolation::new(
                            id.clone(),
                            format!("malformed properties: {}", e),
                        ));
                        continue;
                    }
                }
            }
            _ => continue,
        };

        for statement in &statements {
            for resource in &statement.resources {
                if resource == "*" {
                    violations.push(PolicyViolation::new(
                        id.clone(),
                        format!("statement '{}' grants a wildcard resource", statement.sid),
                    ));
                } else if !allowed.contains(resource) {
                    violations.push(PolicyViolation::new(
                        id.clone(),
                        format!(
                            "statement '{}' names resource '{}' outside this stack",
                            statement.sid, resource
                        ),
                    ));
                }
            }
            if statement.effect == Effect::Allow {
                for action in &statement.actions {
                    if action.contains('*') {
                        violations.push(PolicyViolation::new(
                            id.clone(),
                            format!(
                                "statement '{}' allows wildcard action '{}'",
                                statement.sid, action
                            ),
                        ));
                    }
                }
            }
            if statement.resources.is_empty() {
                violations.push(PolicyViolation::new(
                    id.clone(),
                    format!("statement '{}' names no resources", statement.sid),
                ));
            }
        }
    }
}
