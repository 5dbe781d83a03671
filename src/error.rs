//! Error types for Sitestack.
//!
//! This module defines the error types used throughout Sitestack, providing
//! rich error information for debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

use crate::lint::PolicyViolation;

/// Result type alias for Sitestack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Sitestack.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Stack Definition Errors
    // ========================================================================
    /// Error loading a stack definition file.
    #[error("Failed to load stack definition '{path}': {message}")]
    StackLoad {
        /// Path to the stack definition file
        path: PathBuf,
        /// Error message
        message: String,
        /// Source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error validating the stack definition.
    #[error("Invalid stack definition: {0}")]
    StackValidation(String),

    /// A topology was requested that the configuration cannot satisfy.
    #[error("Invalid topology: {0}")]
    Topology(String),

    // ========================================================================
    // Synthesis and Policy Errors
    // ========================================================================
    /// Error while mapping the configuration to a desired-state document.
    #[error("Synthesis failed for stack '{stack}': {message}")]
    Synthesis {
        /// Stack name
        stack: String,
        /// Error message
        message: String,
    },

    /// The synthesized document violates a least-privilege or safety rule.
    #[error("Policy check failed with {} violation(s)", .violations.len())]
    PolicyCheck {
        /// Individual violations, one per offending declaration
        violations: Vec<PolicyViolation>,
    },

    // ========================================================================
    // State Errors
    // ========================================================================
    /// Error loading a recorded state snapshot.
    #[error("Failed to load state snapshot '{path}': {message}")]
    StateLoad {
        /// Path to the snapshot file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Error persisting a state snapshot.
    #[error("Failed to write state snapshot '{path}': {message}")]
    StateStore {
        /// Path to the snapshot file
        path: PathBuf,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Asset Sync Errors
    // ========================================================================
    /// The configured asset directory does not exist or is not a directory.
    #[error("Asset directory not found: {0}")]
    AssetDirNotFound(PathBuf),

    /// Error walking or reading the local asset tree.
    #[error("Failed to scan assets under '{path}': {message}")]
    AssetScan {
        /// Directory being scanned
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// An exclusion pattern in the stack definition is not a valid glob.
    #[error("Invalid exclusion pattern '{pattern}': {message}")]
    ExcludePattern {
        /// The offending pattern
        pattern: String,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Output Errors
    // ========================================================================
    /// No recorded outputs exist (nothing has been applied yet).
    #[error("No recorded outputs at '{0}'; run apply first")]
    OutputsNotFound(PathBuf),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Tool configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Generic error with source.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a new stack load error.
    pub fn stack_load(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::StackLoad {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Creates a new stack validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::StackValidation(message.into())
    }

    /// Creates a new synthesis error.
    pub fn synthesis(stack: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Synthesis {
            stack: stack.into(),
            message: message.into(),
        }
    }

    /// Creates a new state load error.
    pub fn state_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StateLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new state store error.
    pub fn state_store(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StateStore {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::PolicyCheck { .. } => 2,
            Error::StackLoad { .. }
            | Error::StackValidation(_)
            | Error::Topology(_)
            | Error::Config(_) => 4,
            Error::StateLoad { .. } | Error::StateStore { .. } => 5,
            Error::AssetDirNotFound(_) | Error::AssetScan { .. } | Error::ExcludePattern { .. } => {
                6
            }
            _ => 1,
        }
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Adds context with a closure that is only evaluated on error.
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Other {
            message: message.into(),
            source: Some(Box::new(e)),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| Error::Other {
            message: f().into(),
            source: Some(Box::new(e)),
        })
    }
}
