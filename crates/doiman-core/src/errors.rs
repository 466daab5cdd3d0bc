//! Error types for the lifecycle crate.

use doiman_registry::{DoiState, RegistryError};

/// Local metadata precondition failures.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// One or more required fields are missing. Carries every missing
    /// field, not just the first.
    #[error("missing required metadata attributes: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

/// Errors raised while driving a DOI transition.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The requested transition is not in the closed transition table.
    /// Raised before any network call.
    #[error("unsupported DOI transition: {from} -> {to}")]
    UnsupportedTransition { from: DoiState, to: DoiState },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Local persistence failure.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
