use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::history::{CampaignHistoryEntry, HISTORY_SLOT};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS slots (
            name       TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

// ── Slots ──

pub fn read_slot(conn: &Connection, name: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM slots WHERE name = ?1", params![name], |r| r.get(0))
        .optional()?;
    Ok(value)
}

pub fn write_slot(conn: &Connection, name: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO slots (name, value) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        params![name, value],
    )?;
    Ok(())
}

pub fn delete_slot(conn: &Connection, name: &str) -> Result<bool> {
    let removed = conn.execute("DELETE FROM slots WHERE name = ?1", params![name])?;
    Ok(removed > 0)
}

// ── History ──

/// Stored history, newest first. A missing or unreadable slot is an empty history.
pub fn load_history(conn: &Connection) -> Result<Vec<CampaignHistoryEntry>> {
    let Some(raw) = read_slot(conn, HISTORY_SLOT)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(list) => Ok(list),
        Err(e) => {
            warn!("Ignoring unreadable history slot: {}", e);
            Ok(Vec::new())
        }
    }
}

pub fn save_history(conn: &Connection, list: &[CampaignHistoryEntry]) -> Result<()> {
    let raw = serde_json::to_string(list)?;
    write_slot(conn, HISTORY_SLOT, &raw)
}

pub fn clear_history(conn: &Connection) -> Result<bool> {
    delete_slot(conn, HISTORY_SLOT)
}

// ── Tests ──
