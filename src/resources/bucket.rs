//! Site-asset bucket declaration.
//!
//! The bucket is strictly private: all four public-access dimensions are
//! blocked as a unit, objects are encrypted at rest, and a bucket policy
//! statement (declared separately, see [`crate::resources::iam`]) denies any
//! non-TLS transport. Reads happen exclusively through the CDN's
//! origin-access identity.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declaration of the private object-storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketDeclaration {
    /// Physical bucket name
    pub bucket_name: String,
    /// Public-access block configuration
    pub access_block: PublicAccessBlock,
    /// Server-side encryption at rest
    pub encryption: Encryption,
    /// Whether the bucket policy denies non-TLS requests
    pub enforce_tls: bool,
    /// What happens to the bucket on stack destroy
    pub deletion_policy: DeletionPolicy,
}

impl BucketDeclaration {
    /// A private, encrypted, TLS-enforcing bucket.
    pub fn private(bucket_name: impl Into<String>, deletion_policy: DeletionPolicy) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            access_block: PublicAccessBlock::deny_all(),
            encryption: Encryption::Aes256,
            enforce_tls: true,
            deletion_policy,
        }
    }
}

/// The four public-access dimensions.
///
/// They only make sense toggled together; partial blocking leaves a public
/// path open. [`PublicAccessBlock::denies_all`] is the invariant the policy
/// checker enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAccessBlock {
    /// Reject new public ACLs on bucket or objects
    pub block_public_acls: bool,
    /// Treat existing public ACLs as private
    pub ignore_public_acls: bool,
    /// Reject public bucket policies
    pub block_public_policy: bool,
    /// Restrict cross-account access when a public policy exists
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlock {
    /// Block every public-access dimension.
    pub fn deny_all() -> Self {
        Self {
            block_public_acls: true,
            ignore_public_acls: true,
            block_public_policy: true,
            restrict_public_buckets: true,
        }
    }

    /// True when all four dimensions are blocked.
    pub fn denies_all(&self) -> bool {
        self.block_public_acls
            && self.ignore_public_acls
            && self.block_public_policy
            && self.restrict_public_buckets
    }
}

/// Server-side encryption algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encryption {
    /// SSE-S3 managed keys
    #[serde(rename = "AES256")]
    Aes256,
}

/// Deletion policy for stateful resources on stack destroy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeletionPolicy {
    /// Remove the resource with the stack
    #[default]
    Delete,
    /// Keep the resource when the stack is destroyed
    Retain,
}

impl DeletionPolicy {
    /// Parse a deletion policy from its configuration spelling.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "delete" | "destroy" => Ok(DeletionPolicy::Delete),
            "retain" | "keep" => Ok(DeletionPolicy::Retain),
            _ => Err(Error::validation(format!(
                "invalid deletion policy '{}'. Valid policies: delete, retain",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_all_blocks_every_dimension() {
        let block = PublicAccessBlock::deny_all();
        assert!(block.denies_all());
    }

    #[test]
    fn partial_block_is_not_deny_all() {
        for i in 0..4 {
            let mut block = PublicAccessBlock::deny_all();
            match i {
                0 => block.block_public_acls = false,
                1 => block.ignore_public_acls = false,
                2 => block.block_public_policy = false,
                _ => block.restrict_public_buckets = false,
            }
            assert!(!block.denies_all(), "dimension {} toggled off", i);
        }
    }

    #[test]
    fn deletion_policy_spellings() {
        assert_eq!(
            DeletionPolicy::from_str("retain").unwrap(),
            DeletionPolicy::Retain
        );
        assert_eq!(
            DeletionPolicy::from_str("Delete").unwrap(),
            DeletionPolicy::Delete
        );
        assert!(DeletionPolicy::from_str("maybe").is_err());
    }
}
