//! Stack definition and tool configuration.
//!
//! Two layers are loaded from disk:
//!
//! - The **stack definition** (`stack.yml`): the explicit input to
//!   synthesis. Account and region are ordinary fields here, never read
//!   from ambient process state, so the mapping to a desired-state document
//!   is deterministic and testable.
//! - The **tool configuration** (`sitestack.cfg`, TOML): where state and
//!   rendered output live, colors, logging. All optional with defaults.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::resources::bucket::DeletionPolicy;
use crate::resources::distribution::{CachePolicy, ErrorResponse};
use crate::secrets::SecretRef;
use crate::topology::{RedirectPolicy, Topology};

static HOSTNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)+$")
        .expect("hostname pattern is valid")
});

static STACK_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]{0,39}$").expect("stack name pattern is valid"));

static ACCOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{12}$").expect("account pattern is valid"));

static REGION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+(-[a-z]+)+-\d$").expect("region pattern is valid"));

/// The stack definition: everything synthesis needs, made explicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    /// Stack name; also the state snapshot key
    pub stack: String,
    /// Twelve-digit account id
    pub account: String,
    /// Stack region (the certificate region is pinned separately)
    pub region: String,
    /// Hostname serving content
    pub primary_hostname: String,
    /// Optional second hostname
    #[serde(default)]
    pub alias_hostname: Option<String>,
    /// How the alias relates to the primary
    #[serde(default)]
    pub redirect_policy: RedirectPolicy,
    /// DNS zone owning both hostnames and the certificate validation
    /// records
    pub hosted_zone: String,
    /// Local build output to sync into the bucket
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Content-distribution cache TTLs
    #[serde(default)]
    pub cache: CacheConfig,
    /// Error-page remapping rules
    #[serde(default = "default_error_pages")]
    pub error_pages: Vec<ErrorPageConfig>,
    /// Bucket fate on stack destroy
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
    /// Overrides for where CI credentials are stored
    #[serde(default)]
    pub secrets: Option<SecretsConfig>,
}

impl StackConfig {
    /// Load and validate a stack definition from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::stack_load(path, "cannot read file", Some(Box::new(e)))
        })?;
        let config: StackConfig = serde_yaml::from_str(&content)
            .map_err(|e| Error::stack_load(path, e.to_string(), Some(Box::new(e))))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every field and cross-field invariant.
    pub fn validate(&self) -> Result<()> {
        if !STACK_NAME_RE.is_match(&self.stack) {
            return Err(Error::validation(format!(
                "stack name '{}' must be lowercase alphanumeric/hyphen, max 40 chars",
                self.stack
            )));
        }
        if !ACCOUNT_RE.is_match(&self.account) {
            return Err(Error::validation(format!(
                "account '{}' must be a twelve-digit id",
                self.account
            )));
        }
        if !REGION_RE.is_match(&self.region) {
            return Err(Error::validation(format!(
                "region '{}' is not a valid region name",
                self.region
            )));
        }
        for hostname in [Some(&self.primary_hostname), self.alias_hostname.as_ref()]
            .into_iter()
            .flatten()
        {
            if !HOSTNAME_RE.is_match(hostname) {
                return Err(Error::validation(format!(
                    "invalid hostname '{}'",
                    hostname
                )));
            }
        }
        if !HOSTNAME_RE.is_match(&self.hosted_zone) {
            return Err(Error::validation(format!(
                "invalid hosted zone '{}'",
                self.hosted_zone
            )));
        }
        if self.alias_hostname.as_deref() == Some(self.primary_hostname.as_str()) {
            return Err(Error::validation(
                "alias hostname must differ from the primary hostname".to_string(),
            ));
        }
        // A hostname outside the validation zone stalls certificate
        // issuance indefinitely, so it fails here instead.
        for hostname in [Some(&self.primary_hostname), self.alias_hostname.as_ref()]
            .into_iter()
            .flatten()
        {
            if !zone_owns(&self.hosted_zone, hostname) {
                return Err(Error::validation(format!(
                    "hostname '{}' is not owned by hosted zone '{}'",
                    hostname, self.hosted_zone
                )));
            }
        }
        // Fails early on redirect-without-alias.
        Topology::select(
            &self.primary_hostname,
            self.alias_hostname.as_deref(),
            self.redirect_policy,
        )?;
        self.cache.validate()?;
        for page in &self.error_pages {
            page.validate()?;
        }
        if let Some(secrets) = &self.secrets {
            secrets.validate()?;
        }
        Ok(())
    }

    /// Select the distribution topology for this definition.
    pub fn topology(&self) -> Result<Topology> {
        Topology::select(
            &self.primary_hostname,
            self.alias_hostname.as_deref(),
            self.redirect_policy,
        )
    }

    /// Physical bucket name: globally unique via the account id.
    pub fn bucket_name(&self) -> String {
        format!("{}-assets-{}", self.stack, self.account)
    }

    /// Where the deployer principal's credentials land.
    pub fn deployer_secret(&self) -> SecretRef {
        self.secrets
            .as_ref()
            .map(|s| s.deployer_credentials.clone())
            .unwrap_or_else(|| {
                SecretRef::secretsmanager(format!("{}/deployer-credentials", self.stack))
            })
    }

    /// Where the admin principal's credentials land.
    pub fn admin_secret(&self) -> SecretRef {
        self.secrets
            .as_ref()
            .map(|s| s.admin_credentials.clone())
            .unwrap_or_else(|| {
                SecretRef::secretsmanager(format!("{}/admin-credentials", self.stack))
            })
    }
}

fn zone_owns(zone: &str, hostname: &str) -> bool {
    hostname == zone || hostname.ends_with(&format!(".{}", zone))
}

/// Local asset directory and upload exclusions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory holding the built site
    pub dir: PathBuf,
    /// Glob patterns never uploaded, regardless of local presence
    pub exclude: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dist"),
            exclude: vec!["*.map".to_string()],
        }
    }
}

impl AssetsConfig {
    /// Compile the exclusion patterns.
    pub fn exclude_globs(&self) -> Result<globset::GlobSet> {
        let mut builder = globset::GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = globset::Glob::new(pattern).map_err(|e| Error::ExcludePattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| Error::ExcludePattern {
            pattern: self.exclude.join(", "),
            message: e.to_string(),
        })
    }
}

/// Cache TTLs for the content distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Default object lifetime in seconds
    pub default_ttl_secs: u64,
    /// Lower TTL bound in seconds
    pub min_ttl_secs: u64,
    /// Upper TTL bound in seconds
    pub max_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 86_400,
            min_ttl_secs: 0,
            max_ttl_secs: 31_536_000,
        }
    }
}

impl CacheConfig {
    fn validate(&self) -> Result<()> {
        if self.min_ttl_secs > self.default_ttl_secs || self.default_ttl_secs > self.max_ttl_secs {
            return Err(Error::validation(format!(
                "cache TTLs must satisfy min <= default <= max, got {}/{}/{}",
                self.min_ttl_secs, self.default_ttl_secs, self.max_ttl_secs
            )));
        }
        Ok(())
    }

    /// The cache policy for the content distribution.
    pub fn to_policy(&self) -> CachePolicy {
        CachePolicy::Cached {
            default_ttl_secs: self.default_ttl_secs,
            min_ttl_secs: self.min_ttl_secs,
            max_ttl_secs: self.max_ttl_secs,
        }
    }
}

/// One error-page remapping rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPageConfig {
    /// Origin status code being remapped
    pub error_code: u16,
    /// Status code returned to the viewer
    pub response_code: u16,
    /// Page served instead of the error body
    pub path: String,
}

impl ErrorPageConfig {
    fn validate(&self) -> Result<()> {
        if !(400..=599).contains(&self.error_code) {
            return Err(Error::validation(format!(
                "error page maps non-error status {}",
                self.error_code
            )));
        }
        if !(200..=599).contains(&self.response_code) {
            return Err(Error::validation(format!(
                "error page response status {} is not a valid HTTP status",
                self.response_code
            )));
        }
        if !self.path.starts_with('/') {
            return Err(Error::validation(format!(
                "error page path '{}' must start with '/'",
                self.path
            )));
        }
        Ok(())
    }

    /// Convert into the declaration shape.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_code: self.error_code,
            response_code: self.response_code,
            response_page_path: self.path.clone(),
        }
    }
}

fn default_error_pages() -> Vec<ErrorPageConfig> {
    vec![
        // A private bucket answers 403 for missing keys; both map to the
        // same page.
        ErrorPageConfig {
            error_code: 403,
            response_code: 404,
            path: "/404.html".to_string(),
        },
        ErrorPageConfig {
            error_code: 404,
            response_code: 404,
            path: "/404.html".to_string(),
        },
    ]
}

/// Overrides for credential secret locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Deployer principal credentials
    pub deployer_credentials: SecretRef,
    /// Admin principal credentials
    pub admin_credentials: SecretRef,
}

impl SecretsConfig {
    fn validate(&self) -> Result<()> {
        if self.deployer_credentials == self.admin_credentials {
            return Err(Error::validation(
                "deployer and admin credentials must use distinct secret references".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Tool configuration
// ============================================================================

/// Default tool configuration file name.
pub const TOOL_CONFIG_FILE: &str = "sitestack.cfg";

/// Tool-level settings, loaded from TOML with full defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Directory layout
    pub paths: PathsConfig,
    /// Console colors
    pub colors: ColorsConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl ToolConfig {
    /// Load the tool configuration.
    ///
    /// An explicit path must exist; the default path is optional and
    /// silently falls back to defaults.
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.clone(), true),
            None => (PathBuf::from(TOOL_CONFIG_FILE), false),
        };
        if !path.exists() {
            if required {
                return Err(Error::Config(format!(
                    "configuration file not found: {}",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Where state snapshots and rendered documents live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// State snapshot directory
    pub state_dir: PathBuf,
    /// Rendered document and outputs directory
    pub out_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(".sitestack/state"),
            out_dir: PathBuf::from(".sitestack/out"),
        }
    }
}

/// Console color settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Enable colored output
    pub enabled: bool,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when no verbosity flags are given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> StackConfig {
        StackConfig {
            stack: "site-prod".to_string(),
            account: "123456789012".to_string(),
            region: "eu-west-1".to_string(),
            primary_hostname: "example.com".to_string(),
            alias_hostname: Some("www.example.com".to_string()),
            redirect_policy: RedirectPolicy::Merge,
            hosted_zone: "example.com".to_string(),
            assets: AssetsConfig::default(),
            cache: CacheConfig::default(),
            error_pages: default_error_pages(),
            deletion_policy: DeletionPolicy::Delete,
            secrets: None,
        }
    }

    #[test]
    fn valid_definition_passes() {
        base().validate().unwrap();
    }

    #[test]
    fn account_must_be_twelve_digits() {
        let mut config = base();
        config.account = "12345".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn hostname_outside_zone_is_rejected() {
        let mut config = base();
        config.alias_hostname = Some("www.other.org".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not owned by hosted zone"));
    }

    #[test]
    fn alias_must_differ_from_primary() {
        let mut config = base();
        config.alias_hostname = Some("example.com".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn redirect_without_alias_is_rejected() {
        let mut config = base();
        config.alias_hostname = None;
        config.redirect_policy = RedirectPolicy::RedirectAliasToPrimary;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_ttls_are_rejected() {
        let mut config = base();
        config.cache.min_ttl_secs = 100;
        config.cache.default_ttl_secs = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bucket_name_embeds_account() {
        assert_eq!(base().bucket_name(), "site-prod-assets-123456789012");
    }

    #[test]
    fn default_secret_refs_derive_from_stack_name() {
        let config = base();
        assert_eq!(
            config.deployer_secret().to_string(),
            "secretsmanager/site-prod/deployer-credentials"
        );
        assert_eq!(
            config.admin_secret().to_string(),
            "secretsmanager/site-prod/admin-credentials"
        );
    }

    #[test]
    fn tool_config_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.paths.state_dir, PathBuf::from(".sitestack/state"));
        assert!(config.colors.enabled);
    }
}
