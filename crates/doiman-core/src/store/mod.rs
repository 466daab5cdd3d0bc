//! Local persistence: DOI records, the audit trail and configurations.
//!
//! SQLite-backed. The identifier string is the only durable piece of
//! remote state held locally; state labels are always re-derived from the
//! authority.

mod configurations;
mod records;
pub mod rows;
mod schema;

use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use rusqlite::Connection;
use tracing::warn;

use doiman_registry::{HistoryEntry, HistorySink};

pub use configurations::NewConfiguration;
pub use rows::{ConfigurationRow, DoiRecordRow, HistoryRow};

pub(crate) fn now_unix() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// SQLite store behind a mutex.
#[derive(Debug)]
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("open store database")?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store for tests and dry runs.
    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory store")?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("store lock poisoned")
    }

    // --- records ---

    /// Get the record for a resource, creating it on first use.
    pub fn get_or_create_record(&self, resource_id: &str) -> anyhow::Result<DoiRecordRow> {
        records::get_or_create_impl(&self.conn(), resource_id, now_unix())
    }

    pub fn record(&self, record_id: i64) -> anyhow::Result<DoiRecordRow> {
        records::get_by_id_impl(&self.conn(), record_id)
    }

    pub fn record_for_resource(
        &self,
        resource_id: &str,
    ) -> anyhow::Result<Option<DoiRecordRow>> {
        records::get_by_resource_impl(&self.conn(), resource_id)
    }

    /// Persist the identifier for a record.
    pub fn set_doi(&self, record_id: i64, doi: &str) -> anyhow::Result<()> {
        records::set_doi_impl(&self.conn(), record_id, doi, now_unix())
    }

    /// Cache a citation snippet for a record.
    pub fn set_citation_snippet(&self, record_id: i64, snippet: &str) -> anyhow::Result<()> {
        records::set_citation_snippet_impl(&self.conn(), record_id, snippet, now_unix())
    }

    /// Append one audit trail row for a record.
    pub fn append_history(&self, record_id: i64, entry: &HistoryEntry) -> anyhow::Result<()> {
        records::append_history_impl(&self.conn(), record_id, entry)
    }

    /// The audit trail for a record, oldest first.
    pub fn history(&self, record_id: i64) -> anyhow::Result<Vec<HistoryRow>> {
        records::history_impl(&self.conn(), record_id)
    }

    /// History sink bound to one record, for registry client calls.
    pub fn sink(&self, record_id: i64) -> RecordSink<'_> {
        RecordSink {
            store: self,
            record_id,
        }
    }

    // --- configurations ---

    pub fn insert_configuration(&self, config: &NewConfiguration) -> anyhow::Result<i64> {
        configurations::insert_impl(&self.conn(), config)
    }

    /// The single active configuration, if any exists yet.
    pub fn active_configuration(&self) -> anyhow::Result<Option<ConfigurationRow>> {
        configurations::active_impl(&self.conn())
    }

    pub fn list_configurations(&self) -> anyhow::Result<Vec<ConfigurationRow>> {
        configurations::list_impl(&self.conn())
    }

    /// Activate one configuration, atomically deactivating the others.
    pub fn set_active_configuration(&self, id: i64) -> anyhow::Result<()> {
        configurations::set_active_impl(&mut self.conn(), id)
    }

    /// Deactivate a configuration; rejected for the last active one.
    pub fn deactivate_configuration(&self, id: i64) -> anyhow::Result<()> {
        configurations::deactivate_impl(&mut self.conn(), id)
    }
}

/// [`HistorySink`] bound to one record.
///
/// Appends are best-effort audit: a persistence failure is logged and
/// swallowed so that the remote call's own result stays authoritative.
pub struct RecordSink<'a> {
    store: &'a Store,
    record_id: i64,
}

impl HistorySink for RecordSink<'_> {
    fn append(&self, entry: HistoryEntry) {
        if let Err(e) = self.store.append_history(self.record_id, &entry) {
            warn!(record_id = self.record_id, error = %e, "failed to persist history entry");
        }
    }
}
