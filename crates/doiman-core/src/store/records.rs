//! Record and history queries.

use anyhow::Context;
use doiman_registry::HistoryEntry;
use rusqlite::{params, Connection, OptionalExtension};

use crate::store::rows::{DoiRecordRow, HistoryRow};

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<DoiRecordRow> {
    Ok(DoiRecordRow {
        id: row.get(0)?,
        resource_id: row.get(1)?,
        doi: row.get(2)?,
        citation_snippet: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

const RECORD_COLUMNS: &str =
    "id, resource_id, doi, citation_snippet, created_at, updated_at";

pub(crate) fn get_by_resource_impl(
    conn: &Connection,
    resource_id: &str,
) -> anyhow::Result<Option<DoiRecordRow>> {
    conn.query_row(
        &format!("SELECT {RECORD_COLUMNS} FROM doi_records WHERE resource_id = ?1"),
        params![resource_id],
        row_to_record,
    )
    .optional()
    .context("select doi record by resource")
}

pub(crate) fn get_by_id_impl(conn: &Connection, id: i64) -> anyhow::Result<DoiRecordRow> {
    conn.query_row(
        &format!("SELECT {RECORD_COLUMNS} FROM doi_records WHERE id = ?1"),
        params![id],
        row_to_record,
    )
    .context("select doi record by id")
}

pub(crate) fn get_or_create_impl(
    conn: &Connection,
    resource_id: &str,
    now: i64,
) -> anyhow::Result<DoiRecordRow> {
    if let Some(record) = get_by_resource_impl(conn, resource_id)? {
        return Ok(record);
    }
    conn.execute(
        "INSERT INTO doi_records (resource_id, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![resource_id, now],
    )
    .context("insert doi record")?;
    get_by_id_impl(conn, conn.last_insert_rowid())
}

pub(crate) fn set_doi_impl(
    conn: &Connection,
    record_id: i64,
    doi: &str,
    now: i64,
) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE doi_records SET doi = ?2, updated_at = ?3 WHERE id = ?1",
        params![record_id, doi, now],
    )
    .context("update doi record identifier")?;
    Ok(())
}

pub(crate) fn set_citation_snippet_impl(
    conn: &Connection,
    record_id: i64,
    snippet: &str,
    now: i64,
) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE doi_records SET citation_snippet = ?2, updated_at = ?3 WHERE id = ?1",
        params![record_id, snippet, now],
    )
    .context("update citation snippet")?;
    Ok(())
}

pub(crate) fn append_history_impl(
    conn: &Connection,
    record_id: i64,
    entry: &HistoryEntry,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO doi_history
            (record_id, at, method, url, request_body, response_status, response_body, error)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record_id,
            entry.at.to_rfc3339(),
            entry.method,
            entry.url,
            entry.request_body,
            entry.response_status,
            entry.response_body,
            entry.error,
        ],
    )
    .context("append history entry")?;
    Ok(())
}

pub(crate) fn history_impl(conn: &Connection, record_id: i64) -> anyhow::Result<Vec<HistoryRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, record_id, at, method, url, request_body, response_status, response_body, error
         FROM doi_history
         WHERE record_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map(params![record_id], |row| {
            Ok(HistoryRow {
                id: row.get(0)?,
                record_id: row.get(1)?,
                at: row.get(2)?,
                method: row.get(3)?,
                url: row.get(4)?,
                request_body: row.get(5)?,
                response_status: row.get(6)?,
                response_body: row.get(7)?,
                error: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .context("load history rows")?;
    Ok(rows)
}
