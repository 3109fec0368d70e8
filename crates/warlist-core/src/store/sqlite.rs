//! SQLite store: rows in the `wars` table of a DDNet database.
//!
//! The table has no clan column, so clan-only entries cannot exist here and
//! duplicate detection is nick-within-group only. Checks run against the
//! live table row by row, which also catches repeats inside one batch.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::backup::{self, Session};
use crate::error::Result;
use crate::models::{fold, Entry, Group};
use crate::store::{duplicate_warning, AppendOutcome, StorePreview, WarStore};
use crate::validate::partition_safe;

pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Render the statement an append would execute, for previews.
    pub fn format_insert(group: Group, entry: &Entry) -> String {
        format!(
            "INSERT INTO wars (name, state, reason) VALUES ('{}', {}, '{}')",
            sql_string(&entry.nick),
            group.state(),
            sql_string(&entry.reason),
        )
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Connection::open(&self.path)?)
    }

    fn ensure_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS wars (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                state INTEGER,
                reason TEXT
            )",
        )?;
        Ok(())
    }

    fn table_exists(conn: &Connection) -> Result<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'wars'",
                [],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Nick-within-group duplicate check against the live table.
    fn is_duplicate(conn: &Connection, nick: &str, state: i64) -> Result<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM wars WHERE lower(name) = ?1 AND state = ?2",
                params![fold(nick), state],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl WarStore for SqliteStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn supports_clan(&self) -> bool {
        false
    }

    fn preview(&self, group: Group, entries: &[Entry]) -> Result<StorePreview> {
        let mut preview = StorePreview::default();
        let (_, invalid) = partition_safe(entries);
        preview.invalid = invalid;
        for entry in entries {
            preview.lines.push(Self::format_insert(group, entry));
        }
        // Opening a connection would create the file; a missing database
        // has no duplicates.
        if self.path.exists() {
            let conn = Connection::open(&self.path)?;
            if Self::table_exists(&conn)? {
                for entry in entries {
                    if Self::is_duplicate(&conn, &entry.nick, group.state())? {
                        preview.duplicates.push(duplicate_warning(entry));
                    }
                }
            }
        }
        Ok(preview)
    }

    fn append(
        &self,
        group: Group,
        entries: &[Entry],
        session: &mut Session,
        backup_enabled: bool,
    ) -> Result<AppendOutcome> {
        let mut outcome = AppendOutcome::default();
        let (valid, invalid) = partition_safe(entries);
        outcome.invalid = invalid;
        if valid.is_empty() {
            return Ok(outcome);
        }

        let conn = self.connect()?;
        let mut have_table = Self::table_exists(&conn)?;
        let state = group.state();
        for entry in valid {
            if have_table && Self::is_duplicate(&conn, &entry.nick, state)? {
                outcome
                    .skipped
                    .push((entry.nick.clone(), entry.clan.clone()));
                continue;
            }
            // First actual write: snapshot the database, then make sure
            // the table is there.
            if outcome.written == 0 {
                if backup_enabled {
                    outcome.backup = Some(backup::create_backup(session, &self.path)?);
                }
                Self::ensure_schema(&conn)?;
                have_table = true;
            }
            conn.execute(
                "INSERT INTO wars (name, state, reason) VALUES (?1, ?2, ?3)",
                params![entry.nick, state, entry.reason],
            )?;
            outcome.written += 1;
        }
        debug!(
            path = %self.path.display(),
            written = outcome.written,
            skipped = outcome.skipped.len(),
            "appended rows"
        );
        Ok(outcome)
    }
}

fn sql_string(s: &str) -> String {
    s.replace('\'', "''")
}
