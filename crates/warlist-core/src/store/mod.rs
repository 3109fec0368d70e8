//! Persistence backends for the war list.
//!
//! Two stores implement the same contract: the TaterClient text config and
//! the DDNet SQLite database. Duplicate detection, nick validation, and the
//! pre-write backup all live behind [`WarStore`], so frontends only choose
//! a variant and a path.

mod sqlite;
mod text;

pub use sqlite::SqliteStore;
pub use text::TextStore;

use std::path::{Path, PathBuf};

use crate::backup::Session;
use crate::error::Result;
use crate::models::{Entry, Group};

/// Store variant a path should be opened as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// `add_war_entry` lines in a TaterClient config file.
    Text,
    /// Rows in the `wars` table of a DDNet SQLite database.
    Sqlite,
}

/// Result of a dry-run preview. Nothing has been written.
#[derive(Debug, Clone, Default)]
pub struct StorePreview {
    /// What the append would write, one line per entry, in input order.
    pub lines: Vec<String>,
    /// Warnings for entries already present in the store.
    pub duplicates: Vec<String>,
    /// Nicks that failed the safety check.
    pub invalid: Vec<String>,
}

/// Result of an append.
#[derive(Debug, Clone, Default)]
pub struct AppendOutcome {
    /// Entries actually written.
    pub written: usize,
    /// `(nick, clan)` pairs skipped as already present.
    pub skipped: Vec<(String, String)>,
    /// Nicks excluded by the safety check.
    pub invalid: Vec<String>,
    /// Backup created before the write, if one was.
    pub backup: Option<PathBuf>,
}

/// Contract shared by both persistence variants.
pub trait WarStore {
    /// Path of the underlying store file.
    fn path(&self) -> &Path;

    /// Whether this variant persists a clan field.
    fn supports_clan(&self) -> bool;

    /// Format entries and flag duplicates without touching the store.
    fn preview(&self, group: Group, entries: &[Entry]) -> Result<StorePreview>;

    /// Validate, dedup, optionally back up, then append what is new.
    ///
    /// Nothing new to write means nothing happens: no store mutation and no
    /// backup.
    fn append(
        &self,
        group: Group,
        entries: &[Entry],
        session: &mut Session,
        backup_enabled: bool,
    ) -> Result<AppendOutcome>;
}

/// Open the store variant selected by `kind`.
pub fn open(kind: StoreKind, path: impl Into<PathBuf>) -> Box<dyn WarStore> {
    match kind {
        StoreKind::Text => Box::new(TextStore::new(path)),
        StoreKind::Sqlite => Box::new(SqliteStore::new(path)),
    }
}

/// Shared `SKIP (duplicate)` warning format.
pub(crate) fn duplicate_warning(entry: &Entry) -> String {
    format!("SKIP (duplicate): {} ({})", entry.nick, entry.clan)
}
