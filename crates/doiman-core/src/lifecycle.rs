//! Lifecycle orchestrator: one invocation per (resource, requested
//! transition) pair.

use doiman_registry::{DoiState, RegistryClient};
use tracing::{debug, info};

use crate::citation::fetch_citation_snippet;
use crate::errors::LifecycleError;
use crate::metadata::build_metadata;
use crate::resource::{ResourceRecord, SiteConfig};
use crate::state::{plan_transition, TransitionAction};
use crate::store::{DoiRecordRow, Store};

/// Outcome of one orchestrator invocation.
///
/// Transition failures are collected here for display rather than raised;
/// only store-level failures abort the invocation itself.
#[derive(Debug)]
pub struct LifecycleReport {
    /// The local record after the invocation.
    pub record: DoiRecordRow,

    /// Remote state as last observed.
    pub state: DoiState,

    /// Whether the authority knows the identifier.
    pub found: bool,

    /// The transition that was requested, if any.
    pub requested: Option<DoiState>,

    /// Identifier returned/confirmed by a successful transition.
    pub transition_result: Option<String>,

    /// Errors collected during the transition.
    pub errors: Vec<LifecycleError>,
}

/// Drives DOI state transitions for catalog resources.
pub struct Lifecycle {
    client: RegistryClient,
    store: Store,
    site: SiteConfig,
    doi_base_url: String,
    prefix: String,
}

impl Lifecycle {
    pub fn new(
        client: RegistryClient,
        store: Store,
        site: SiteConfig,
        doi_base_url: impl Into<String>,
    ) -> Self {
        let prefix = client.prefix().to_string();
        Self {
            client,
            store,
            site,
            doi_base_url: doi_base_url.into(),
            prefix,
        }
    }

    /// Local record store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Synchronize a resource's DOI, optionally driving one transition.
    ///
    /// Always: get-or-create the local record, query the remote state and
    /// reconcile the locally persisted identifier. With a requested target
    /// state: validate the transition locally (metadata preconditions and
    /// the closed transition table, both before any mutating call), execute
    /// it, persist the resulting identifier, re-query to confirm, and on
    /// reaching findable cache a citation snippet best-effort.
    pub async fn sync(
        &self,
        resource: &ResourceRecord,
        transition_to: Option<DoiState>,
    ) -> Result<LifecycleReport, LifecycleError> {
        let record = self.store.get_or_create_record(&resource.id)?;
        let doi = record.doi.clone();

        let (mut state, mut found) = self.client.query_state(doi.as_deref()).await;
        debug!(resource = %resource.id, doi = ?doi, state = %state, found, "remote state");

        if found {
            // The authority knows this identifier; make sure it is pinned
            // locally.
            if let Some(doi) = &doi {
                self.store.set_doi(record.id, doi)?;
            }
        }

        let mut report = LifecycleReport {
            record: self.store.record(record.id)?,
            state,
            found,
            requested: transition_to,
            transition_result: None,
            errors: Vec::new(),
        };

        let Some(target) = transition_to else {
            return Ok(report);
        };
        if target == state {
            // Idempotent: already there, no mutating call.
            return Ok(report);
        }

        info!(resource = %resource.id, from = %state, to = %target, "DOI transition");

        match self.transition(&record, resource, doi.as_deref(), state, target).await {
            Ok(result_doi) => {
                self.store.set_doi(record.id, &result_doi)?;

                // Confirm against the authority.
                (state, found) = self.client.query_state(Some(&result_doi)).await;

                if target == DoiState::Findable && state == DoiState::Findable {
                    let snippet =
                        fetch_citation_snippet(&self.doi_base_url, &result_doi).await;
                    self.store.set_citation_snippet(record.id, &snippet)?;
                }

                report.transition_result = Some(result_doi);
            }
            Err(e) => report.errors.push(e),
        }

        report.record = self.store.record(record.id)?;
        report.state = state;
        report.found = found;
        Ok(report)
    }

    /// Execute one planned transition; returns the identifier involved.
    async fn transition(
        &self,
        record: &DoiRecordRow,
        resource: &ResourceRecord,
        doi: Option<&str>,
        current: DoiState,
        target: DoiState,
    ) -> Result<String, LifecycleError> {
        // Closed transition table; rejected before any network call.
        let action = plan_transition(current, target)?;

        // Metadata preconditions likewise fail before any mutation, and
        // metadata is resubmitted on every transition that carries it.
        let built = build_metadata(resource, doi, &self.prefix, &self.site)?;
        let sink = self.store.sink(record.id);

        match action {
            TransitionAction::CreateDraft => {
                // The authority assigns the suffix; the returned identifier
                // becomes the record's permanent one.
                let doi = self
                    .client
                    .create_draft(Some(built.attributes), None, &sink)
                    .await?;
                Ok(doi)
            }
            TransitionAction::Register => {
                let doi = required_doi(doi, current, target)?;
                self.client
                    .change_state(doi, doiman_registry::DoiEvent::Register, built.attributes, &sink)
                    .await?;
                Ok(doi.to_string())
            }
            TransitionAction::Hide => {
                let doi = required_doi(doi, current, target)?;
                self.client.hide(doi, &sink).await?;
                Ok(doi.to_string())
            }
            TransitionAction::Publish => {
                let doi = required_doi(doi, current, target)?;
                self.client
                    .change_state(doi, doiman_registry::DoiEvent::Publish, built.attributes, &sink)
                    .await?;
                Ok(doi.to_string())
            }
        }
    }
}

fn required_doi<'a>(
    doi: Option<&'a str>,
    from: DoiState,
    to: DoiState,
) -> Result<&'a str, LifecycleError> {
    // Only reachable when the remote said the record exists but the local
    // identifier is gone; treat as an unsupported request.
    doi.ok_or(LifecycleError::UnsupportedTransition { from, to })
}
