//! DataCite REST client for DOI registration.
//!
//! This crate provides the remote half of the DOI lifecycle manager:
//!
//! - Authenticated HTTP transport with fixed timeout (no retries)
//! - Typed error taxonomy over the authority's status codes
//! - Registration client: create/update/transition/delete/query DOIs
//! - DOI string normalization and prefix validation
//! - Audit trail entries for every mutating call
//!
//! # Quick Start
//!
//! ```no_run
//! use doiman_registry::{DataCiteInstance, MemorySink, RegistryClient, RegistryConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = RegistryConfig::new(DataCiteInstance::Test, "REPO.ID", "secret", "10.5438");
//! let client = RegistryClient::new(&config)?;
//!
//! let sink = MemorySink::new();
//! let doi = client.create_draft(None, None, &sink).await?;
//! let (state, found) = client.query_state(Some(&doi)).await;
//! println!("{doi} is {state} (found: {found})");
//! # Ok(())
//! # }
//! ```
//!
//! # Audit trail
//!
//! Every mutating call (POST/PUT/DELETE) appends exactly one
//! [`HistoryEntry`] to the caller-supplied [`HistorySink`], success or
//! failure. GET operations append nothing.

pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod identifier;
pub mod transport;
pub mod types;

pub use client::RegistryClient;
pub use config::{DataCiteInstance, Environment, RegistryConfig};
pub use error::{RegistryError, RegistryResult};
pub use history::{HistoryEntry, HistorySink, MemorySink};
pub use identifier::{check_doi, normalize_doi};
pub use transport::Transport;
pub use types::{
    Creator, Description, DoiAttributes, DoiEvent, DoiState, NameIdentifier, ResourceType, Title,
};
