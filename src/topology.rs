//! Distribution topology selection.
//!
//! Given a primary hostname, an optional alias, and the configured redirect
//! policy, decide whether both hostnames share one distribution or split
//! into a content distribution plus a redirecting alias distribution. This
//! is a pure decision over the stack definition; the synthesizer turns the
//! result into declarations.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How an alias hostname relates to the primary hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RedirectPolicy {
    /// Serve both hostnames from one distribution with shared content
    #[default]
    Merge,
    /// Give the alias its own distribution that 301s to the primary
    RedirectAliasToPrimary,
}

/// The selected distribution layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// One distribution bound to every hostname
    Single {
        /// Bound hostnames, primary first
        hostnames: Vec<String>,
    },
    /// Content distribution for the primary, redirect distribution for the
    /// alias
    Split {
        /// Hostname serving content
        primary: String,
        /// Hostname answering with redirects
        alias: String,
    },
}

impl Topology {
    /// Select a topology for the given hostnames and policy.
    pub fn select(
        primary: &str,
        alias: Option<&str>,
        policy: RedirectPolicy,
    ) -> Result<Topology> {
        match (alias, policy) {
            (None, RedirectPolicy::Merge) => Ok(Topology::Single {
                hostnames: vec![primary.to_string()],
            }),
            (None, RedirectPolicy::RedirectAliasToPrimary) => Err(Error::Topology(
                "redirect-alias-to-primary requires an alias hostname".to_string(),
            )),
            (Some(alias), RedirectPolicy::Merge) => Ok(Topology::Single {
                hostnames: vec![primary.to_string(), alias.to_string()],
            }),
            (Some(alias), RedirectPolicy::RedirectAliasToPrimary) => Ok(Topology::Split {
                primary: primary.to_string(),
                alias: alias.to_string(),
            }),
        }
    }

    /// Every hostname the topology binds, primary first.
    pub fn hostnames(&self) -> Vec<&str> {
        match self {
            Topology::Single { hostnames } => hostnames.iter().map(String::as_str).collect(),
            Topology::Split { primary, alias } => vec![primary.as_str(), alias.as_str()],
        }
    }
}
