//! Error types for quizstack.
//!
//! All errors use `thiserror`. Every failure aborts the composition; no
//! variant carries a partial topology.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for quizstack operations.
pub type Result<T> = std::result::Result<T, QuizstackError>;

/// Broad failure class, used by callers to report and by tests to assert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A referenced external resource does not exist.
    Lookup,
    /// A required field is missing or malformed.
    Validation,
    /// Settings, I/O or rendering problems outside the composition itself.
    Internal,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Lookup => write!(f, "lookup failure"),
            FailureKind::Validation => write!(f, "validation failure"),
            FailureKind::Internal => write!(f, "internal failure"),
        }
    }
}

/// Main error type for quizstack.
#[derive(Error, Debug)]
pub enum QuizstackError {
    // Lookup errors
    #[error("Network not found: {vpc_id} in region {region}")]
    NetworkNotFound { vpc_id: String, region: String },

    #[error("Security group not found: {group_id} in region {region}")]
    SecurityGroupNotFound { group_id: String, region: String },

    #[error("Hosted zone not found for domain: {domain}")]
    HostedZoneNotFound { domain: String },

    #[error("Lookup of {resource} failed: {reason}")]
    LookupFailed { resource: String, reason: String },

    // Validation errors
    #[error("Required field {field} is not set")]
    MissingField { field: String },

    #[error("Invalid port in {field}: {value:?} ({reason})")]
    InvalidPort { field: String, value: String, reason: String },

    #[error("Network {vpc_id} has no public subnets for a public service")]
    NoPublicSubnets { vpc_id: String },

    #[error("Security group {group_id} belongs to {actual}, expected network {expected}")]
    SecurityGroupVpcMismatch { group_id: String, expected: String, actual: String },

    // Graph errors
    #[error(
        "Missing dependency: resource '{resource}' depends on '{dependency}' which does not exist"
    )]
    MissingDependency { resource: String, dependency: String },

    #[error("Circular dependency detected at resource: {resource}")]
    CircularDependency { resource: String },

    #[error("Resource declared twice: {resource}")]
    DuplicateResource { resource: String },

    // Configuration errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("I/O error at {path:?}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render topology: {reason}")]
    RenderFailed { reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuizstackError {
    /// Classify the error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NetworkNotFound { .. }
            | Self::SecurityGroupNotFound { .. }
            | Self::HostedZoneNotFound { .. }
            | Self::LookupFailed { .. } => FailureKind::Lookup,
            Self::MissingField { .. }
            | Self::InvalidPort { .. }
            | Self::NoPublicSubnets { .. }
            | Self::SecurityGroupVpcMismatch { .. }
            | Self::MissingDependency { .. }
            | Self::CircularDependency { .. }
            | Self::DuplicateResource { .. } => FailureKind::Validation,
            Self::InvalidConfig { .. }
            | Self::IoError { .. }
            | Self::RenderFailed { .. }
            | Self::Internal(_) => FailureKind::Internal,
        }
    }
}
