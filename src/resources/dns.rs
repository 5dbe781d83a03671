//! DNS alias record declarations.

use serde::{Deserialize, Serialize};

use super::distribution_endpoint;

/// An alias record binding one hostname to a distribution endpoint.
///
/// The target embeds the distribution's endpoint token, so replacing a
/// distribution changes the record's properties and the plan shows the
/// record updating alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecordDeclaration {
    /// Hosted zone owning the record
    pub zone_name: String,
    /// Fully qualified record name
    pub record_name: String,
    /// Record type
    pub record_type: RecordType,
    /// Where the record points
    pub target: AliasTarget,
}

impl AliasRecordDeclaration {
    /// An A-alias from `record_name` to the named distribution's endpoint.
    pub fn to_distribution(
        zone_name: impl Into<String>,
        record_name: impl Into<String>,
        distribution_id: &str,
    ) -> Self {
        Self {
            zone_name: zone_name.into(),
            record_name: record_name.into(),
            record_type: RecordType::A,
            target: AliasTarget {
                distribution: distribution_id.to_string(),
                endpoint: distribution_endpoint(distribution_id),
            },
        }
    }
}

/// DNS record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 alias
    A,
}

/// Alias target: a distribution's stable endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    /// Logical id of the distribution
    pub distribution: String,
    /// Endpoint reference token
    pub endpoint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_targets_distribution_endpoint() {
        let record = AliasRecordDeclaration::to_distribution(
            "example.com",
            "www.example.com",
            "AliasDistribution",
        );
        assert_eq!(record.target.endpoint, "${AliasDistribution.domain_name}");
        assert_eq!(record.record_type, RecordType::A);
    }
}
