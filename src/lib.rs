//! # Sitestack - Declarative Static-Site Infrastructure
//!
//! Sitestack maps an explicit stack definition to a desired-state document
//! for static-website hosting: a private object-storage bucket, one or two
//! CDN distributions, a DNS-validated TLS certificate, alias DNS records,
//! least-privilege access policies, and CI automation principals. The
//! document is everything: an external reconciler diffs it against live
//! infrastructure and performs all orchestration; Sitestack's job is to
//! emit the document correctly, deterministically, and idempotently.
//!
//! ## Core Concepts
//!
//! - **Stack definition**: YAML input naming the hostnames, account,
//!   region, topology, and asset directory
//! - **Desired-state document**: ordered resource declarations plus output
//!   values, rendered as stable JSON
//! - **Topology**: one merged distribution, or a content distribution plus
//!   a redirecting alias distribution
//! - **Plan**: diff of the document against the recorded snapshot
//!   (create/update/delete/no-op), never a mutation
//! - **Apply**: records the document and the asset sync plan as the new
//!   snapshot for the reconciler and CI runner to execute
//! - **Policy checks**: least-privilege rules the reconciler would not
//!   enforce on its own
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           CLI Interface                              │
//! │                    (clap-based command parsing)                      │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Stack Definition                              │
//! │            (explicit account/region/hostname config)                 │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!          ┌─────────────────────────┼─────────────────────────┐
//!          ▼                         ▼                         ▼
//! ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────────┐
//! │    Topology     │   │    Synthesizer      │   │   Policy Checker    │
//! │  (merge/split)  │   │ (config → document) │   │ (least privilege)   │
//! └─────────────────┘   └─────────────────────┘   └─────────────────────┘
//!          │                         │                         │
//!          └─────────────────────────┼─────────────────────────┘
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Plan Engine + Sync Planner                        │
//! │        (document vs snapshot, asset manifest vs local tree)          │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       External Reconciler                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and functions.

    pub use crate::config::{StackConfig, ToolConfig};
    pub use crate::document::{OutputValue, ResourceKind, StackDocument};
    pub use crate::error::{Error, Result};
    pub use crate::lint::{check_document, enforce, PolicyViolation};
    pub use crate::secrets::{SecretRef, SensitiveString};
    pub use crate::state::{
        destroy_plan, diff_documents, ChangeKind, Plan, StackSnapshot, StateStore,
    };
    pub use crate::sync::{plan_sync, scan_assets, SyncPlan};
    pub use crate::synth::synthesize;
    pub use crate::topology::{RedirectPolicy, Topology};
}

// ============================================================================
// Core Modules
// ============================================================================

/// Error types and result aliases for Sitestack operations.
pub mod error;

/// Sensitive-value redaction and secret-store references.
pub mod secrets;

/// The desired-state document: resource declarations and outputs.
pub mod document;

/// Typed resource declarations (bucket, certificate, distributions, DNS,
/// access policies).
pub mod resources;

/// Distribution topology selection: merge both hostnames onto one
/// distribution, or split into content + redirecting alias.
pub mod topology;

// ============================================================================
// Input and Synthesis
// ============================================================================

/// Stack definition (YAML) and tool configuration (TOML).
pub mod config;

/// Pure mapping from a stack definition to a desired-state document.
pub mod synth;

/// Least-privilege and safety checks over a synthesized document.
pub mod lint;

// ============================================================================
// State and Sync
// ============================================================================

/// Recorded snapshots and the plan engine.
pub mod state;

/// Asset sync planning: prune semantics, exclusions, cache invalidation.
pub mod sync;

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of Sitestack.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
