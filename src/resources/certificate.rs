//! TLS certificate declaration.

use serde::{Deserialize, Serialize};

/// Region the certificate must be issued in.
///
/// The CDN only terminates TLS with certificates from this region, no matter
/// where the rest of the stack lives. Synthesis pins it and the policy
/// checker re-verifies it.
pub const CERTIFICATE_REGION: &str = "us-east-1";

/// Declaration of the stack's single TLS certificate.
///
/// One certificate serves every bound hostname: in the split topology both
/// distributions reference it, and the alias hostname rides along as a
/// subject alternative name even though only the content distribution
/// terminates content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateDeclaration {
    /// Primary domain the certificate is issued for
    pub domain_name: String,
    /// Additional hostnames covered by the certificate
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_alternative_names: Vec<String>,
    /// How issuance is proven
    pub validation: Validation,
    /// Issuing region, always [`CERTIFICATE_REGION`]
    pub region: String,
}

impl CertificateDeclaration {
    /// A DNS-validated certificate for the given hostnames.
    ///
    /// The validation records land in `zone`, which must be the zone owning
    /// every listed hostname; the stack definition validates that before
    /// synthesis ever runs, because a mismatched zone stalls issuance
    /// indefinitely instead of failing.
    pub fn dns_validated(
        domain_name: impl Into<String>,
        subject_alternative_names: Vec<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            domain_name: domain_name.into(),
            subject_alternative_names,
            validation: Validation::Dns { zone: zone.into() },
            region: CERTIFICATE_REGION.to_string(),
        }
    }

    /// Every hostname the certificate covers, primary first.
    pub fn covered_hostnames(&self) -> Vec<&str> {
        let mut names = vec![self.domain_name.as_str()];
        names.extend(self.subject_alternative_names.iter().map(String::as_str));
        names
    }
}

/// Certificate validation method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Validation {
    /// Prove ownership via DNS records in the named hosted zone
    Dns {
        /// Hosted zone receiving the validation records
        zone: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dns_validated_pins_region() {
        let cert = CertificateDeclaration::dns_validated(
            "example.com",
            vec!["www.example.com".to_string()],
            "example.com",
        );
        assert_eq!(cert.region, CERTIFICATE_REGION);
        assert_eq!(
            cert.covered_hostnames(),
            vec!["example.com", "www.example.com"]
        );
    }
}
