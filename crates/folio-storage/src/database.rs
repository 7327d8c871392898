//! Database connection and operations

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::StorageError;
use crate::migrations::run_migrations;
use crate::Result;

/// One persisted shadow history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub location: String,
    pub depth: usize,
    pub recorded_at: DateTime<Utc>,
}

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for better concurrent performance
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        // Run migrations
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            let value = conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, updated_at],
            )?;
            Ok(())
        })
    }

    /// Replace the whole stack stored for `scope`
    pub fn save_history(&self, scope: &str, entries: &[StoredEntry]) -> Result<()> {
        self.transaction(|conn| {
            conn.execute("DELETE FROM history_entries WHERE scope = ?1", [scope])?;

            let mut stmt = conn.prepare(
                "INSERT INTO history_entries (scope, position, location, depth, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, entry) in entries.iter().enumerate() {
                stmt.execute(rusqlite::params![
                    scope,
                    position as i64,
                    entry.location,
                    entry.depth as i64,
                    entry.recorded_at.to_rfc3339(),
                ])?;
            }

            Ok(())
        })
    }

    /// Load the stack stored for `scope`, bottom first
    pub fn load_history(&self, scope: &str) -> Result<Vec<StoredEntry>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT location, depth, recorded_at FROM history_entries
                 WHERE scope = ?1
                 ORDER BY position ASC",
            )?;

            let rows = stmt.query_map([scope], |row| {
                let location: String = row.get(0)?;
                let depth: i64 = row.get(1)?;
                let recorded_str: String = row.get(2)?;
                Ok((location, depth, recorded_str))
            })?;

            let mut entries = Vec::new();
            for row in rows {
                let (location, depth, recorded_str) = row?;
                let depth = usize::try_from(depth)
                    .map_err(|_| StorageError::Corrupt(format!("negative depth {}", depth)))?;
                let recorded_at = DateTime::parse_from_rfc3339(&recorded_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now());

                entries.push(StoredEntry {
                    location,
                    depth,
                    recorded_at,
                });
            }

            Ok(entries)
        })
    }

    pub fn clear_history(&self, scope: &str) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM history_entries WHERE scope = ?1", [scope])?;
            Ok(())
        })
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}
