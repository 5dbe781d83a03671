//! Secret handling for Sitestack.
//!
//! Two concerns live here: preventing sensitive output values from leaking
//! into logs and console output, and modeling *references* into an external
//! secret store. Credential material itself is never inlined into a stack
//! definition or a desired-state document; declarations and outputs only
//! carry the store location where the reconciler deposits the value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A string wrapper that prevents the value from being logged.
///
/// When used in format strings or logging, this type displays `[REDACTED]`
/// instead of the actual value. Use `expose()` to access the underlying
/// value when needed.
#[derive(Clone)]
pub struct SensitiveString {
    value: String,
}

impl SensitiveString {
    /// Create a new sensitive string.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Expose the underlying value.
    ///
    /// Use this method when the actual value must be handed to a consumer,
    /// such as when writing a machine-readable outputs file.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Consume and return the underlying value.
    pub fn into_inner(self) -> String {
        self.value
    }

    /// Check if the value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

// Display shows redacted value
impl fmt::Display for SensitiveString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

// Debug shows redacted value
impl fmt::Debug for SensitiveString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SensitiveString([REDACTED])")
    }
}

impl From<String> for SensitiveString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SensitiveString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq for SensitiveString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for SensitiveString {}

/// A reference to a value held in an external secret store.
///
/// Rendered as `<store>/<name>`, e.g. `secretsmanager/site-prod/deployer`.
/// The reconciler resolves the reference; this tool never reads or writes
/// the secret value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    /// Secret store backend identifier
    pub store: String,
    /// Name of the secret within the store
    pub name: String,
}

impl SecretRef {
    /// Create a reference into the default secret store.
    pub fn secretsmanager(name: impl Into<String>) -> Self {
        Self {
            store: "secretsmanager".to_string(),
            name: name.into(),
        }
    }

    /// Parse a `<store>/<name>` reference string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((store, name)) if !store.is_empty() && !name.is_empty() => Ok(Self {
                store: store.to_string(),
                name: name.to_string(),
            }),
            _ => Err(Error::validation(format!(
                "invalid secret reference '{}': expected <store>/<name>",
                s
            ))),
        }
    }
}

impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.store, self.name)
    }
}
