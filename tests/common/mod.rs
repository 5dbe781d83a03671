//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sitestack::config::StackConfig;
use sitestack::topology::RedirectPolicy;

/// A valid merge-topology stack definition.
pub fn merge_config() -> StackConfig {
    serde_yaml::from_str(
        r#"
stack: site-test
account: "123456789012"
region: eu-west-1
primary_hostname: example.com
alias_hostname: www.example.com
hosted_zone: example.com
"#,
    )
    .expect("fixture definition parses")
}

/// The same stack with the split redirect topology.
pub fn split_config() -> StackConfig {
    let mut config = merge_config();
    config.redirect_policy = RedirectPolicy::RedirectAliasToPrimary;
    config
}

/// Write a stack definition to `dir/stack.yml` and return its path.
pub fn write_stack_file(dir: &Path, config: &StackConfig) -> PathBuf {
    let path = dir.join("stack.yml");
    let rendered = serde_yaml::to_string(config).expect("fixture serializes");
    std::fs::write(&path, rendered).expect("fixture written");
    path
}

/// Populate an asset directory with the given relative files.
pub fn write_assets(dir: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("asset dir created");
        }
        std::fs::write(&path, content).expect("asset written");
    }
}
