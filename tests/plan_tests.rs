//! Plan engine tests: idempotence, drift, topology changes, destroy.

mod common;

use common::{merge_config, split_config};
use sitestack::document::ResourceKind;
use sitestack::resources::bucket::DeletionPolicy;
use sitestack::state::{
    destroy_plan, diff_documents, AssetManifest, ChangeKind, StackSnapshot, StateStore,
};
use sitestack::synth::{synthesize, ALIAS_DISTRIBUTION, SITE_BUCKET};

#[test]
fn applying_the_same_definition_twice_plans_no_changes() {
    let config = merge_config();
    let first = synthesize(&config).unwrap();
    let second = synthesize(&config).unwrap();

    let plan = diff_documents(&second, Some(&first)).unwrap();
    assert!(!plan.has_changes());
    assert_eq!(plan.summary().unchanged, plan.changes.len());
}

#[test]
fn fresh_stack_plans_all_creates() {
    let doc = synthesize(&merge_config()).unwrap();
    let plan = diff_documents(&doc, None).unwrap();
    assert_eq!(plan.summary().create, doc.resources.len());
}

#[test]
fn topology_flip_updates_shared_resources_and_creates_alias_pieces() {
    let merged = synthesize(&merge_config()).unwrap();
    let split = synthesize(&split_config()).unwrap();

    let plan = diff_documents(&split, Some(&merged)).unwrap();
    let change_of = |id: &str| {
        plan.changes
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.change)
            .expect("planned")
    };

    // The content distribution sheds the alias hostname.
    assert_eq!(change_of("ContentDistribution"), ChangeKind::Update);
    // The alias pieces come into existence.
    assert_eq!(change_of(ALIAS_DISTRIBUTION), ChangeKind::Create);
    assert_eq!(change_of("AliasRedirectFunction"), ChangeKind::Create);
    // The alias record re-points from the content to the alias
    // distribution.
    assert_eq!(change_of("AliasRecord-www.example.com"), ChangeKind::Update);
    // The bucket itself is untouched.
    assert_eq!(change_of(SITE_BUCKET), ChangeKind::NoOp);
}

#[test]
fn update_details_render_a_unified_diff() {
    let merged = synthesize(&merge_config()).unwrap();
    let split = synthesize(&split_config()).unwrap();

    let plan = diff_documents(&split, Some(&merged)).unwrap();
    let update = plan
        .changes
        .iter()
        .find(|c| c.id == "ContentDistribution")
        .unwrap();
    let detail = update.detail.as_ref().unwrap();
    assert!(detail.contains("www.example.com"));
}

#[test]
fn destroy_plan_covers_every_recorded_resource() {
    let doc = synthesize(&split_config()).unwrap();
    let total = doc.resources.len();
    let plan = destroy_plan(&doc);
    assert_eq!(plan.changes.len(), total);
    assert_eq!(plan.summary().delete, total);
}

#[test]
fn destroy_plan_honors_retain_policy() {
    let mut config = merge_config();
    config.deletion_policy = DeletionPolicy::Retain;
    let doc = synthesize(&config).unwrap();

    let plan = destroy_plan(&doc);
    let bucket = plan.changes.iter().find(|c| c.id == SITE_BUCKET).unwrap();
    assert_eq!(bucket.change, ChangeKind::NoOp);
    assert_eq!(
        bucket.detail.as_deref(),
        Some("retained by deletion policy")
    );
    // Everything else still goes.
    assert!(plan
        .changes
        .iter()
        .filter(|c| c.kind != ResourceKind::Bucket)
        .all(|c| c.change == ChangeKind::Delete));
}

#[test]
fn snapshot_roundtrip_preserves_idempotence() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path());
    let config = merge_config();
    let doc = synthesize(&config).unwrap();

    let snapshot = StackSnapshot::record(doc.clone(), AssetManifest::new()).unwrap();
    store.save(&snapshot).unwrap();

    let loaded = store.load(&config.stack).unwrap().unwrap();
    let plan = diff_documents(&doc, Some(&loaded.document)).unwrap();
    assert!(!plan.has_changes());
}
