//! CDN distribution declaration.

use serde::{Deserialize, Serialize};

/// Declaration of one content-delivery distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionDeclaration {
    /// Hostnames bound to this distribution
    pub aliases: Vec<String>,
    /// Where the distribution reads content from
    pub origin: Origin,
    /// Logical id of the TLS certificate
    pub certificate: String,
    /// Caching behavior
    pub cache: CachePolicy,
    /// How viewers reaching the distribution over HTTP are handled
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    /// Error-page remapping rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_responses: Vec<ErrorResponse>,
    /// Logical id of a viewer-request function, if one is attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_function: Option<String>,
    /// Object served for the bare root path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_root_object: Option<String>,
}

/// Origin reference: the bucket plus the access control that lets only this
/// CDN identity read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Logical id of the bucket declaration
    pub bucket: String,
    /// Logical id of the origin-access-control declaration
    pub origin_access_control: String,
}

/// Caching behavior for a distribution.
///
/// The alias distribution in the split topology must use `Disabled`: its
/// redirects are host-dependent, and a cached redirect would outlive a later
/// topology change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum CachePolicy {
    /// No caching; every request reaches the origin or function
    Disabled,
    /// Standard TTL-based caching
    Cached {
        /// Default object lifetime in seconds
        default_ttl_secs: u64,
        /// Lower TTL bound in seconds
        min_ttl_secs: u64,
        /// Upper TTL bound in seconds
        max_ttl_secs: u64,
    },
}

impl CachePolicy {
    /// True when caching is fully disabled.
    pub fn is_disabled(&self) -> bool {
        matches!(self, CachePolicy::Disabled)
    }
}

/// How viewer requests over plain HTTP are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    /// 301 plain-HTTP viewers to HTTPS
    RedirectToHttps,
    /// Refuse plain HTTP outright
    HttpsOnly,
}

/// Remap an origin error status to a stable error page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Origin status code being remapped
    pub error_code: u16,
    /// Status code returned to the viewer
    pub response_code: u16,
    /// Page served in place of the error body
    pub response_page_path: String,
}

/// Origin access control: the signed-request identity the CDN presents to
/// the bucket. The bucket policy grants reads to this identity scoped per
/// distribution ARN, so declaring the control alone authorizes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginAccessControlDeclaration {
    /// Control name
    pub name: String,
    /// Origin type the control signs for
    pub origin_type: String,
    /// Signing behavior; requests are always signed
    pub signing: SigningBehavior,
}

impl OriginAccessControlDeclaration {
    /// The standard always-sign control for a bucket origin.
    pub fn for_bucket(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin_type: "s3".to_string(),
            signing: SigningBehavior::Always,
        }
    }
}

/// When the CDN signs origin requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningBehavior {
    /// Sign every origin request
    Always,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_policy_disabled() {
        assert!(CachePolicy::Disabled.is_disabled());
        assert!(!CachePolicy::Cached {
            default_ttl_secs: 86400,
            min_ttl_secs: 0,
            max_ttl_secs: 31536000,
        }
        .is_disabled());
    }

    #[test]
    fn cache_policy_serde_shape() {
        let v = serde_json::to_value(CachePolicy::Disabled).unwrap();
        assert_eq!(v["mode"], "disabled");
    }
}
