//! DOI lifecycle manager core.
//!
//! Drives persistent identifier registration against a DataCite-style
//! authority:
//!
//! - Closed identifier state machine (unset → draft → registered ⇄ findable)
//! - Registration payload builder with all-at-once precondition checks
//! - SQLite store for records, the append-only audit trail and the
//!   single-active configuration repository
//! - Lifecycle orchestrator tying the pieces together per resource
//!
//! Remote state is never stored: the locally persisted identifier string is
//! the only durable state, and state labels are re-derived from the
//! authority on every invocation.

pub mod citation;
pub mod errors;
pub mod lifecycle;
pub mod metadata;
pub mod resource;
pub mod state;
pub mod store;

pub use citation::fetch_citation_snippet;
pub use errors::{LifecycleError, LifecycleResult, MetadataError};
pub use lifecycle::{Lifecycle, LifecycleReport};
pub use metadata::{build_metadata, BuiltMetadata};
pub use resource::{InstitutionId, ResourceCreator, ResourceRecord, SiteConfig};
pub use state::{allowed_targets, plan_transition, TransitionAction};
pub use store::{ConfigurationRow, DoiRecordRow, HistoryRow, NewConfiguration, Store};

// Re-export the remote half alongside the core types.
pub use doiman_registry::{
    DataCiteInstance, DoiAttributes, DoiEvent, DoiState, HistoryEntry, HistorySink,
    RegistryClient, RegistryConfig, RegistryError,
};
