//! Schema initialization for the local store.

use anyhow::Context;
use rusqlite::Connection;

/// Create all tables if they do not exist.
///
/// `doi_records` enforces the record invariant: a record with no linked
/// resource must also have no identifier value. `doi_history` is a
/// separate append-only log keyed by record id, ordered by insertion.
pub(crate) fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS doi_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            resource_id TEXT UNIQUE,
            doi TEXT UNIQUE,
            citation_snippet TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            CHECK (resource_id IS NOT NULL OR doi IS NULL)
        );

        CREATE TABLE IF NOT EXISTS doi_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            record_id INTEGER NOT NULL REFERENCES doi_records(id),
            at TEXT NOT NULL,
            method TEXT NOT NULL,
            url TEXT NOT NULL,
            request_body TEXT,
            response_status INTEGER,
            response_body TEXT,
            error TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_doi_history_record
            ON doi_history(record_id, id);

        CREATE TABLE IF NOT EXISTS configurations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            is_active INTEGER NOT NULL DEFAULT 0,
            instance TEXT NOT NULL DEFAULT 'test',
            doi_prefix TEXT NOT NULL,
            repo_id TEXT NOT NULL,
            password TEXT NOT NULL,
            note TEXT NOT NULL DEFAULT ''
        );",
    )
    .context("initialize store schema")?;
    Ok(())
}
