//! Desired-state synthesis.
//!
//! One pure function maps a validated [`StackConfig`] to a
//! [`StackDocument`]. There is exactly one stack shape per deployment, so
//! no builder hierarchy or runtime polymorphism is involved: the topology
//! selector picks the distribution layout and everything else follows from
//! the configuration. Logical ids are fixed constants so that re-synthesis
//! of an unchanged definition is byte-identical, and so that flipping the
//! topology reads as an update of the content distribution plus
//! creation/deletion of the alias pieces, not a teardown of the world.

use crate::config::StackConfig;
use crate::document::{OutputValue, ResourceKind, StackDocument};
use crate::error::Result;
use crate::resources::bucket::BucketDeclaration;
use crate::resources::certificate::CertificateDeclaration;
use crate::resources::distribution::{
    CachePolicy, DistributionDeclaration, Origin, OriginAccessControlDeclaration,
    ViewerProtocolPolicy,
};
use crate::resources::dns::AliasRecordDeclaration;
use crate::resources::function::ViewerFunctionDeclaration;
use crate::resources::iam::{BucketPolicyDeclaration, CiPrincipalDeclaration, PolicyStatement};
use crate::resources::{distribution_arn, distribution_id_token};
use crate::topology::Topology;

/// Logical id of the site bucket.
pub const SITE_BUCKET: &str = "SiteBucket";
/// Logical id of the bucket policy.
pub const SITE_BUCKET_POLICY: &str = "SiteBucketPolicy";
/// Logical id of the TLS certificate.
pub const SITE_CERTIFICATE: &str = "SiteCertificate";
/// Logical id of the origin access control.
pub const SITE_OAC: &str = "SiteOriginAccessControl";
/// Logical id of the content distribution.
pub const CONTENT_DISTRIBUTION: &str = "ContentDistribution";
/// Logical id of the redirecting alias distribution.
pub const ALIAS_DISTRIBUTION: &str = "AliasDistribution";
/// Logical id of the viewer-request redirect function.
pub const ALIAS_REDIRECT_FUNCTION: &str = "AliasRedirectFunction";
/// Logical id of the narrow CI principal.
pub const DEPLOYER_PRINCIPAL: &str = "DeployerPrincipal";
/// Logical id of the broad CI principal.
pub const ADMIN_PRINCIPAL: &str = "AdminPrincipal";

/// Logical id of the alias record for a hostname.
pub fn alias_record_id(hostname: &str) -> String {
    format!("AliasRecord-{}", hostname)
}

/// Map a stack definition to its desired-state document.
pub fn synthesize(config: &StackConfig) -> Result<StackDocument> {
    let topology = config.topology()?;
    let bucket_name = config.bucket_name();
    let mut doc = StackDocument::new(&config.stack);

    // Certificate first: one per stack, covering every bound hostname.
    let alternative_names: Vec<String> = topology
        .hostnames()
        .iter()
        .skip(1)
        .map(|s| s.to_string())
        .collect();
    doc.declare(
        SITE_CERTIFICATE,
        ResourceKind::Certificate,
        &CertificateDeclaration::dns_validated(
            &config.primary_hostname,
            alternative_names,
            &config.hosted_zone,
        ),
        vec![],
    )?;

    doc.declare(
        SITE_OAC,
        ResourceKind::OriginAccessControl,
        &OriginAccessControlDeclaration::for_bucket(format!("{}-oac", config.stack)),
        vec![],
    )?;

    doc.declare(
        SITE_BUCKET,
        ResourceKind::Bucket,
        &BucketDeclaration::private(&bucket_name, config.deletion_policy),
        vec![],
    )?;

    let origin = Origin {
        bucket: SITE_BUCKET.to_string(),
        origin_access_control: SITE_OAC.to_string(),
    };

    // Hostname -> distribution bindings, primary first.
    let mut bindings: Vec<(String, &'static str)> = Vec::new();
    let mut distribution_ids: Vec<&'static str> = vec![CONTENT_DISTRIBUTION];

    match &topology {
        Topology::Single { hostnames } => {
            doc.declare(
                CONTENT_DISTRIBUTION,
                ResourceKind::Distribution,
                &DistributionDeclaration {
                    aliases: hostnames.clone(),
                    origin: origin.clone(),
                    certificate: SITE_CERTIFICATE.to_string(),
                    cache: config.cache.to_policy(),
                    viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
                    error_responses: config.error_pages.iter().map(|p| p.to_response()).collect(),
                    viewer_function: None,
                    default_root_object: Some("index.html".to_string()),
                },
                vec![
                    SITE_BUCKET.to_string(),
                    SITE_OAC.to_string(),
                    SITE_CERTIFICATE.to_string(),
                ],
            )?;
            for hostname in hostnames {
                bindings.push((hostname.clone(), CONTENT_DISTRIBUTION));
            }
        }
        Topology::Split { primary, alias } => {
            doc.declare(
                CONTENT_DISTRIBUTION,
                ResourceKind::Distribution,
                &DistributionDeclaration {
                    aliases: vec![primary.clone()],
                    origin: origin.clone(),
                    certificate: SITE_CERTIFICATE.to_string(),
                    cache: config.cache.to_policy(),
                    viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
                    error_responses: config.error_pages.iter().map(|p| p.to_response()).collect(),
                    viewer_function: None,
                    default_root_object: Some("index.html".to_string()),
                },
                vec![
                    SITE_BUCKET.to_string(),
                    SITE_OAC.to_string(),
                    SITE_CERTIFICATE.to_string(),
                ],
            )?;

            doc.declare(
                ALIAS_REDIRECT_FUNCTION,
                ResourceKind::ViewerFunction,
                &ViewerFunctionDeclaration::redirect(alias, primary),
                vec![],
            )?;

            // Redirects are host-dependent: caching stays off so a stale
            // entry cannot outlive a topology change.
            doc.declare(
                ALIAS_DISTRIBUTION,
                ResourceKind::Distribution,
                &DistributionDeclaration {
                    aliases: vec![alias.clone()],
                    origin,
                    certificate: SITE_CERTIFICATE.to_string(),
                    cache: CachePolicy::Disabled,
                    viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
                    error_responses: vec![],
                    viewer_function: Some(ALIAS_REDIRECT_FUNCTION.to_string()),
                    default_root_object: None,
                },
                vec![
                    SITE_BUCKET.to_string(),
                    SITE_OAC.to_string(),
                    SITE_CERTIFICATE.to_string(),
                    ALIAS_REDIRECT_FUNCTION.to_string(),
                ],
            )?;

            bindings.push((primary.clone(), CONTENT_DISTRIBUTION));
            bindings.push((alias.clone(), ALIAS_DISTRIBUTION));
            distribution_ids.push(ALIAS_DISTRIBUTION);
        }
    }

    let distribution_arns: Vec<String> = distribution_ids
        .iter()
        .map(|id| distribution_arn(&config.account, id))
        .collect();

    // One origin-read statement per distribution, each scoped by its own
    // ARN.
    let mut statements = vec![PolicyStatement::deny_insecure_transport(&bucket_name)];
    for (id, arn) in distribution_ids.iter().zip(&distribution_arns) {
        statements.push(PolicyStatement::origin_read(
            &bucket_name,
            arn,
            format!("Allow{}Read", id),
        ));
    }
    let mut policy_references = vec![SITE_BUCKET.to_string()];
    policy_references.extend(distribution_ids.iter().map(|id| id.to_string()));
    doc.declare(
        SITE_BUCKET_POLICY,
        ResourceKind::BucketPolicy,
        &BucketPolicyDeclaration {
            bucket: SITE_BUCKET.to_string(),
            statements,
        },
        policy_references.clone(),
    )?;

    for (hostname, dist_id) in &bindings {
        doc.declare(
            alias_record_id(hostname),
            ResourceKind::AliasRecord,
            &AliasRecordDeclaration::to_distribution(&config.hosted_zone, hostname, dist_id),
            vec![dist_id.to_string()],
        )?;
    }

    doc.declare(
        DEPLOYER_PRINCIPAL,
        ResourceKind::CiPrincipal,
        &CiPrincipalDeclaration::deployer(
            format!("{}-deployer", config.stack),
            &bucket_name,
            &distribution_arns,
            config.deployer_secret(),
        ),
        policy_references.clone(),
    )?;
    doc.declare(
        ADMIN_PRINCIPAL,
        ResourceKind::CiPrincipal,
        &CiPrincipalDeclaration::admin(
            format!("{}-admin", config.stack),
            &bucket_name,
            &distribution_arns,
            config.admin_secret(),
        ),
        policy_references,
    )?;

    // Outputs for downstream CI steps.
    doc.output(
        "bucket_name",
        OutputValue::plain(&bucket_name, "Site asset bucket"),
    );
    doc.output(
        "account",
        OutputValue::plain(&config.account, "Target account id"),
    );
    doc.output(
        "region",
        OutputValue::plain(&config.region, "Target region"),
    );
    doc.output(
        "content_distribution_id",
        OutputValue::plain(
            distribution_id_token(CONTENT_DISTRIBUTION),
            "Content distribution id",
        ),
    );
    if distribution_ids.contains(&ALIAS_DISTRIBUTION) {
        doc.output(
            "alias_distribution_id",
            OutputValue::plain(
                distribution_id_token(ALIAS_DISTRIBUTION),
                "Alias distribution id",
            ),
        );
    }
    doc.output(
        "site_url",
        OutputValue::plain(
            format!("https://{}", config.primary_hostname),
            "Public site URL",
        ),
    );
    if let Some(alias) = &config.alias_hostname {
        doc.output(
            "alias_url",
            OutputValue::plain(format!("https://{}", alias), "Alias URL"),
        );
    }
    doc.output(
        "deployer_credentials",
        OutputValue::sensitive(
            config.deployer_secret().to_string(),
            "Secret reference for the deployer principal credentials",
        ),
    );
    doc.output(
        "admin_credentials",
        OutputValue::sensitive(
            config.admin_secret().to_string(),
            "Secret reference for the admin principal credentials",
        ),
    );

    Ok(doc)
}
