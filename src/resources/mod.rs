//! Typed resource declarations.
//!
//! Each submodule models the configuration of one cloud resource kind as it
//! appears in the desired-state document. These are declarations, not
//! clients: nothing here talks to a control plane. The shapes are serialized
//! into [`crate::document::ResourceDeclaration`] properties by the
//! synthesizer and deserialized back by the policy checker.
//!
//! Identifiers that only exist after the reconciler has applied the stack
//! (distribution ids, endpoints) are carried as `${LogicalId...}` reference
//! tokens which the reconciler resolves.

pub mod bucket;
pub mod certificate;
pub mod distribution;
pub mod dns;
pub mod function;
pub mod iam;

/// ARN of the bucket itself.
pub fn bucket_arn(bucket_name: &str) -> String {
    format!("arn:aws:s3:::{}", bucket_name)
}

/// ARN matching every object in the bucket.
pub fn bucket_objects_arn(bucket_name: &str) -> String {
    format!("arn:aws:s3:::{}/*", bucket_name)
}

/// Reference-token ARN for a distribution declared in this stack.
///
/// The physical id does not exist until the reconciler creates the
/// distribution, so the token embeds the logical id for it to substitute.
pub fn distribution_arn(account: &str, logical_id: &str) -> String {
    format!(
        "arn:aws:cloudfront::{}:distribution/${{{}}}",
        account, logical_id
    )
}

/// Reference token for a distribution's stable DNS endpoint.
pub fn distribution_endpoint(logical_id: &str) -> String {
    format!("${{{}.domain_name}}", logical_id)
}

/// Reference token for a distribution's physical id.
pub fn distribution_id_token(logical_id: &str) -> String {
    format!("${{{}.id}}", logical_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arn_helpers() {
        assert_eq!(bucket_arn("site-assets"), "arn:aws:s3:::site-assets");
        assert_eq!(
            bucket_objects_arn("site-assets"),
            "arn:aws:s3:::site-assets/*"
        );
        assert_eq!(
            distribution_arn("123456789012", "ContentDistribution"),
            "arn:aws:cloudfront::123456789012:distribution/${ContentDistribution}"
        );
        assert_eq!(
            distribution_endpoint("ContentDistribution"),
            "${ContentDistribution.domain_name}"
        );
    }
}
