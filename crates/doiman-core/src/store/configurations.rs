//! Configuration repository.
//!
//! Exactly one configuration row is active at any time. Activation is an
//! explicit `set_active` that atomically deactivates the others, not a
//! save-time side effect; deactivating the last active row is rejected.

use anyhow::{bail, Context};
use rusqlite::{params, Connection, OptionalExtension};

use crate::store::rows::ConfigurationRow;

/// Input for a new configuration row.
#[derive(Debug, Clone)]
pub struct NewConfiguration {
    pub instance: String,
    pub doi_prefix: String,
    pub repo_id: String,
    pub password: String,
    pub note: String,
}

fn row_to_configuration(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConfigurationRow> {
    Ok(ConfigurationRow {
        id: row.get(0)?,
        is_active: row.get::<_, i64>(1)? != 0,
        instance: row.get(2)?,
        doi_prefix: row.get(3)?,
        repo_id: row.get(4)?,
        password: row.get(5)?,
        note: row.get(6)?,
    })
}

const CONFIGURATION_COLUMNS: &str =
    "id, is_active, instance, doi_prefix, repo_id, password, note";

/// Insert a configuration. The first row inserted becomes active.
pub(crate) fn insert_impl(conn: &Connection, config: &NewConfiguration) -> anyhow::Result<i64> {
    let any_active: i64 = conn.query_row(
        "SELECT COUNT(*) FROM configurations WHERE is_active = 1",
        [],
        |row| row.get(0),
    )?;
    conn.execute(
        "INSERT INTO configurations (is_active, instance, doi_prefix, repo_id, password, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            i64::from(any_active == 0),
            config.instance,
            config.doi_prefix,
            config.repo_id,
            config.password,
            config.note,
        ],
    )
    .context("insert configuration")?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn active_impl(conn: &Connection) -> anyhow::Result<Option<ConfigurationRow>> {
    conn.query_row(
        &format!("SELECT {CONFIGURATION_COLUMNS} FROM configurations WHERE is_active = 1"),
        [],
        row_to_configuration,
    )
    .optional()
    .context("select active configuration")
}

pub(crate) fn list_impl(conn: &Connection) -> anyhow::Result<Vec<ConfigurationRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONFIGURATION_COLUMNS} FROM configurations ORDER BY id ASC"
    ))?;
    let rows = stmt
        .query_map([], row_to_configuration)?
        .collect::<Result<Vec<_>, _>>()
        .context("load configuration rows")?;
    Ok(rows)
}

/// Activate one configuration, deactivating all others in one transaction.
pub(crate) fn set_active_impl(conn: &mut Connection, id: i64) -> anyhow::Result<()> {
    let tx = conn.transaction()?;
    let exists: i64 = tx.query_row(
        "SELECT COUNT(*) FROM configurations WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    if exists == 0 {
        bail!("configuration {id} does not exist");
    }
    tx.execute(
        "UPDATE configurations SET is_active = CASE WHEN id = ?1 THEN 1 ELSE 0 END",
        params![id],
    )?;
    tx.commit().context("commit set_active")?;
    Ok(())
}

/// Deactivate one configuration; the last active row cannot be removed.
pub(crate) fn deactivate_impl(conn: &mut Connection, id: i64) -> anyhow::Result<()> {
    let tx = conn.transaction()?;
    let is_active: Option<i64> = tx
        .query_row(
            "SELECT is_active FROM configurations WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(is_active) = is_active else {
        bail!("configuration {id} does not exist");
    };
    if is_active != 0 {
        let other_active: i64 = tx.query_row(
            "SELECT COUNT(*) FROM configurations WHERE is_active = 1 AND id != ?1",
            params![id],
            |row| row.get(0),
        )?;
        if other_active == 0 {
            bail!("at least one configuration must be active");
        }
    }
    tx.execute(
        "UPDATE configurations SET is_active = 0 WHERE id = ?1",
        params![id],
    )?;
    tx.commit().context("commit deactivate")?;
    Ok(())
}
