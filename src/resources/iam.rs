//! Access-policy declarations.
//!
//! Two independent least-privilege surfaces are modeled here: the bucket
//! policy granting each CDN identity read access scoped by its own
//! distribution ARN, and the two CI principals whose policies enumerate
//! exact actions over exact resource ARNs. Wildcard resource grants are
//! rejected by the policy checker even though a reconciler would accept
//! them.

use serde::{Deserialize, Serialize};

use super::{bucket_arn, bucket_objects_arn};
use crate::secrets::SecretRef;

/// Statement effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Who a bucket-policy statement applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Principal {
    /// A cloud service identity
    Service(String),
    /// Every principal
    Any,
}

/// A single condition clause on a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Condition operator, e.g. `StringEquals`
    pub test: String,
    /// Context key being tested
    pub key: String,
    /// Accepted values
    pub values: Vec<String>,
}

/// One policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    /// Statement id
    pub sid: String,
    /// Allow or deny
    pub effect: Effect,
    /// Principal, present only in bucket-policy statements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    /// Exact actions
    pub actions: Vec<String>,
    /// Exact resource ARNs
    pub resources: Vec<String>,
    /// Optional condition clause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl PolicyStatement {
    /// Deny any request to the bucket or its objects that arrives without
    /// TLS.
    pub fn deny_insecure_transport(bucket_name: &str) -> Self {
        Self {
            sid: "DenyInsecureTransport".to_string(),
            effect: Effect::Deny,
            principal: Some(Principal::Any),
            actions: vec!["s3:*".to_string()],
            resources: vec![bucket_arn(bucket_name), bucket_objects_arn(bucket_name)],
            condition: Some(Condition {
                test: "Bool".to_string(),
                key: "aws:SecureTransport".to_string(),
                values: vec!["false".to_string()],
            }),
        }
    }

    /// Allow exactly one distribution's CDN identity to read objects.
    ///
    /// The condition keys on that distribution's ARN: granting one
    /// distribution never implicitly authorizes the other.
    pub fn origin_read(bucket_name: &str, distribution_arn: &str, sid: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            effect: Effect::Allow,
            principal: Some(Principal::Service("cloudfront.amazonaws.com".to_string())),
            actions: vec!["s3:GetObject".to_string()],
            resources: vec![bucket_objects_arn(bucket_name)],
            condition: Some(Condition {
                test: "StringEquals".to_string(),
                key: "aws:SourceArn".to_string(),
                values: vec![distribution_arn.to_string()],
            }),
        }
    }
}

/// The bucket policy declaration: TLS enforcement plus one origin-read
/// statement per distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketPolicyDeclaration {
    /// Logical id of the bucket the policy attaches to
    pub bucket: String,
    /// Policy statements
    pub statements: Vec<PolicyStatement>,
}

/// A CI automation principal and its scoped policy.
///
/// Credentials for the principal are deposited by the reconciler at the
/// named secret reference; the desired-state document never carries
/// credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiPrincipalDeclaration {
    /// Principal user name
    pub user_name: String,
    /// Identity policy statements (no principal field)
    pub statements: Vec<PolicyStatement>,
    /// Where the principal's credentials are stored
    pub credential_secret: SecretRef,
}

impl CiPrincipalDeclaration {
    /// The narrow principal: asset sync plus cache invalidation, nothing
    /// else.
    pub fn deployer(
        user_name: impl Into<String>,
        bucket_name: &str,
        distribution_arns: &[String],
        credential_secret: SecretRef,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            statements: vec![
                PolicyStatement {
                    sid: "SyncAssets".to_string(),
                    effect: Effect::Allow,
                    principal: None,
                    actions: vec![
                        "s3:GetObject".to_string(),
                        "s3:PutObject".to_string(),
                        "s3:DeleteObject".to_string(),
                    ],
                    resources: vec![bucket_objects_arn(bucket_name)],
                    condition: None,
                },
                PolicyStatement {
                    sid: "ListAssets".to_string(),
                    effect: Effect::Allow,
                    principal: None,
                    actions: vec!["s3:ListBucket".to_string()],
                    resources: vec![bucket_arn(bucket_name)],
                    condition: None,
                },
                PolicyStatement {
                    sid: "InvalidateCache".to_string(),
                    effect: Effect::Allow,
                    principal: None,
                    actions: vec!["cloudfront:CreateInvalidation".to_string()],
                    resources: distribution_arns.to_vec(),
                    condition: None,
                },
            ],
            credential_secret,
        }
    }

    /// The broad principal: infrastructure changes to this stack's bucket
    /// and distributions. Broader in actions, identically scoped in
    /// resources.
    pub fn admin(
        user_name: impl Into<String>,
        bucket_name: &str,
        distribution_arns: &[String],
        credential_secret: SecretRef,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            statements: vec![
                PolicyStatement {
                    sid: "ManageBucket".to_string(),
                    effect: Effect::Allow,
                    principal: None,
                    actions: vec![
                        "s3:GetBucketPolicy".to_string(),
                        "s3:PutBucketPolicy".to_string(),
                        "s3:PutEncryptionConfiguration".to_string(),
                        "s3:PutBucketPublicAccessBlock".to_string(),
                        "s3:GetBucketLocation".to_string(),
                        "s3:ListBucket".to_string(),
                    ],
                    resources: vec![bucket_arn(bucket_name)],
                    condition: None,
                },
                PolicyStatement {
                    sid: "ManageObjects".to_string(),
                    effect: Effect::Allow,
                    principal: None,
                    actions: vec![
                        "s3:GetObject".to_string(),
                        "s3:PutObject".to_string(),
                        "s3:DeleteObject".to_string(),
                    ],
                    resources: vec![bucket_objects_arn(bucket_name)],
                    condition: None,
                },
                PolicyStatement {
                    sid: "ManageDistributions".to_string(),
                    effect: Effect::Allow,
                    principal: None,
                    actions: vec![
                        "cloudfront:GetDistribution".to_string(),
                        "cloudfront:UpdateDistribution".to_string(),
                        "cloudfront:CreateInvalidation".to_string(),
                    ],
                    resources: distribution_arns.to_vec(),
                    condition: None,
                },
            ],
            credential_secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_read_is_scoped_to_one_distribution() {
        let arn = "arn:aws:cloudfront::123456789012:distribution/${ContentDistribution}";
        let statement = PolicyStatement::origin_read("site-assets", arn, "AllowContentRead");
        let condition = statement.condition.unwrap();
        assert_eq!(condition.key, "aws:SourceArn");
        assert_eq!(condition.values, vec![arn.to_string()]);
        assert_eq!(statement.resources, vec!["arn:aws:s3:::site-assets/*"]);
    }

    #[test]
    fn deployer_enumerates_exact_resources() {
        let arns = vec!["arn:aws:cloudfront::123456789012:distribution/${D}".to_string()];
        let principal = CiPrincipalDeclaration::deployer(
            "site-deployer",
            "site-assets",
            &arns,
            SecretRef::secretsmanager("site/deployer"),
        );
        for statement in &principal.statements {
            assert!(!statement.resources.iter().any(|r| r == "*"));
        }
    }
}
