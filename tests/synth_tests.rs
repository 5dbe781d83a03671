//! Synthesis tests: document shapes for both topologies.

mod common;

use pretty_assertions::assert_eq;

use common::{merge_config, split_config};
use sitestack::document::ResourceKind;
use sitestack::resources::certificate::{CertificateDeclaration, CERTIFICATE_REGION};
use sitestack::resources::distribution::DistributionDeclaration;
use sitestack::resources::iam::{BucketPolicyDeclaration, CiPrincipalDeclaration};
use sitestack::synth::{
    synthesize, ALIAS_DISTRIBUTION, ALIAS_REDIRECT_FUNCTION, CONTENT_DISTRIBUTION,
    SITE_BUCKET, SITE_BUCKET_POLICY,
};

fn distribution(doc: &sitestack::document::StackDocument, id: &str) -> DistributionDeclaration {
    serde_json::from_value(doc.get(id).expect("declared").properties.clone())
        .expect("well-formed distribution")
}

#[test]
fn merge_topology_declares_one_distribution_with_both_hostnames() {
    let doc = synthesize(&merge_config()).unwrap();
    assert_eq!(doc.ids_of_kind(ResourceKind::Distribution), vec![CONTENT_DISTRIBUTION]);

    let dist = distribution(&doc, CONTENT_DISTRIBUTION);
    assert_eq!(
        dist.aliases,
        vec!["example.com".to_string(), "www.example.com".to_string()]
    );
    assert!(dist.viewer_function.is_none());
    assert!(doc.get(ALIAS_REDIRECT_FUNCTION).is_none());
}

#[test]
fn split_topology_declares_redirecting_alias_distribution() {
    let doc = synthesize(&split_config()).unwrap();
    assert_eq!(
        doc.ids_of_kind(ResourceKind::Distribution),
        vec![CONTENT_DISTRIBUTION, ALIAS_DISTRIBUTION]
    );

    let content = distribution(&doc, CONTENT_DISTRIBUTION);
    assert_eq!(content.aliases, vec!["example.com".to_string()]);
    assert!(content.viewer_function.is_none());
    assert!(!content.cache.is_disabled());

    let alias = distribution(&doc, ALIAS_DISTRIBUTION);
    assert_eq!(alias.aliases, vec!["www.example.com".to_string()]);
    assert_eq!(
        alias.viewer_function.as_deref(),
        Some(ALIAS_REDIRECT_FUNCTION)
    );
    // Redirects must not be cached.
    assert!(alias.cache.is_disabled());
}

#[test]
fn both_topologies_share_one_certificate_covering_both_hostnames() {
    for doc in [
        synthesize(&merge_config()).unwrap(),
        synthesize(&split_config()).unwrap(),
    ] {
        let certs = doc.ids_of_kind(ResourceKind::Certificate);
        assert_eq!(certs.len(), 1);
        let cert: CertificateDeclaration =
            serde_json::from_value(doc.get(certs[0]).unwrap().properties.clone()).unwrap();
        assert_eq!(cert.region, CERTIFICATE_REGION);
        let mut covered = cert.covered_hostnames();
        covered.sort_unstable();
        assert_eq!(covered, vec!["example.com", "www.example.com"]);
    }
}

#[test]
fn split_topology_grants_each_distribution_independently() {
    let doc = synthesize(&split_config()).unwrap();
    let policy: BucketPolicyDeclaration =
        serde_json::from_value(doc.get(SITE_BUCKET_POLICY).unwrap().properties.clone()).unwrap();

    let read_statements: Vec<_> = policy
        .statements
        .iter()
        .filter(|s| s.sid.ends_with("Read"))
        .collect();
    assert_eq!(read_statements.len(), 2);

    let conditions: Vec<String> = read_statements
        .iter()
        .map(|s| s.condition.as_ref().unwrap().values[0].clone())
        .collect();
    assert!(conditions[0].contains(CONTENT_DISTRIBUTION));
    assert!(conditions[1].contains(ALIAS_DISTRIBUTION));
    assert_ne!(conditions[0], conditions[1]);
}

#[test]
fn alias_records_bind_each_hostname_to_its_distribution() {
    let doc = synthesize(&split_config()).unwrap();
    let records = doc.ids_of_kind(ResourceKind::AliasRecord);
    assert_eq!(
        records,
        vec!["AliasRecord-example.com", "AliasRecord-www.example.com"]
    );
    let www: sitestack::resources::dns::AliasRecordDeclaration = serde_json::from_value(
        doc.get("AliasRecord-www.example.com")
            .unwrap()
            .properties
            .clone(),
    )
    .unwrap();
    assert_eq!(www.target.distribution, ALIAS_DISTRIBUTION);
}

#[test]
fn ci_principals_differ_in_breadth_not_scope() {
    let doc = synthesize(&merge_config()).unwrap();
    let principals = doc.ids_of_kind(ResourceKind::CiPrincipal);
    assert_eq!(principals.len(), 2);

    let mut action_counts = Vec::new();
    for id in principals {
        let principal: CiPrincipalDeclaration =
            serde_json::from_value(doc.get(id).unwrap().properties.clone()).unwrap();
        for statement in &principal.statements {
            assert!(!statement.resources.iter().any(|r| r == "*"));
        }
        action_counts.push(
            principal
                .statements
                .iter()
                .map(|s| s.actions.len())
                .sum::<usize>(),
        );
    }
    // The admin principal is declared second and carries more actions.
    assert!(action_counts[1] > action_counts[0]);
}

#[test]
fn sensitive_outputs_are_secret_references() {
    let doc = synthesize(&merge_config()).unwrap();
    let deployer = &doc.outputs["deployer_credentials"];
    assert!(deployer.sensitive);
    assert_eq!(
        deployer.value,
        "secretsmanager/site-test/deployer-credentials"
    );
    assert!(!doc.outputs["site_url"].sensitive);
    assert_eq!(doc.outputs["site_url"].value, "https://example.com");
}

#[test]
fn synthesis_is_deterministic() {
    let config = split_config();
    let first = synthesize(&config).unwrap();
    let second = synthesize(&config).unwrap();
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(
        first.fingerprint().unwrap(),
        second.fingerprint().unwrap()
    );
}

#[test]
fn bucket_is_declared_private() {
    let doc = synthesize(&merge_config()).unwrap();
    let bucket: sitestack::resources::bucket::BucketDeclaration =
        serde_json::from_value(doc.get(SITE_BUCKET).unwrap().properties.clone()).unwrap();
    assert!(bucket.access_block.denies_all());
    assert!(bucket.enforce_tls);
    assert_eq!(bucket.bucket_name, "site-test-assets-123456789012");
}
