//! Text store: `add_war_entry` lines in a TaterClient config file.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::backup::{self, Session};
use crate::error::{Error, Result};
use crate::index::{scan_existing, ENTRY_KEYWORD};
use crate::models::{Entry, EntryKey, Group};
use crate::quoting::quote;
use crate::store::{duplicate_warning, AppendOutcome, StorePreview, WarStore};
use crate::validate::partition_safe;

pub struct TextStore {
    path: PathBuf,
}

impl TextStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Render one config line for an entry.
    pub fn format_line(group: Group, entry: &Entry) -> String {
        format!(
            "{} {} {} {} {}",
            ENTRY_KEYWORD,
            quote(group.as_str()),
            quote(&entry.nick),
            quote(&entry.clan),
            quote(&entry.reason),
        )
    }

    /// Index of entries currently in the file. An unreadable or missing
    /// file counts as empty.
    fn read_existing(&self) -> HashSet<EntryKey> {
        match fs::read(&self.path) {
            Ok(bytes) => scan_existing(&String::from_utf8_lossy(&bytes)),
            Err(err) => {
                debug!(path = %self.path.display(), %err, "no existing entries read");
                HashSet::new()
            }
        }
    }

    fn write_err(&self, source: std::io::Error) -> Error {
        Error::StoreWrite {
            path: self.path.clone(),
            source,
        }
    }

    /// Create the file with a comment header, parents included.
    fn create_with_header(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_err(e))?;
        }
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        fs::write(&self.path, format!("# {name} (created automatically)\n"))
            .map_err(|e| self.write_err(e))
    }
}

impl WarStore for TextStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn supports_clan(&self) -> bool {
        true
    }

    fn preview(&self, group: Group, entries: &[Entry]) -> Result<StorePreview> {
        let mut preview = StorePreview::default();
        let (_, invalid) = partition_safe(entries);
        preview.invalid = invalid;
        for entry in entries {
            preview.lines.push(Self::format_line(group, entry));
        }
        if self.path.exists() {
            let existing = self.read_existing();
            for entry in entries {
                if existing.contains(&EntryKey::of(group, entry)) {
                    preview.duplicates.push(duplicate_warning(entry));
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

        // The index is read once per append; entries written in this batch
        // extend it so the batch cannot introduce its own duplicates.
        let mut existing = self.read_existing();
        let mut to_write = Vec::new();
        for entry in valid {
            let key = EntryKey::of(group, &entry);
            if existing.contains(&key) {
                outcome.skipped.push((entry.nick.clone(), entry.clan.clone()));
            } else {
                existing.insert(key);
                to_write.push(entry);
            }
        }
        if to_write.is_empty() {
            return Ok(outcome);
        }

        if !self.path.exists() {
            self.create_with_header()?;
        }
        if backup_enabled {
            outcome.backup = Some(backup::create_backup(session, &self.path)?);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_err(e))?;
        for entry in &to_write {
            writeln!(file, "{}", Self::format_line(group, entry)).map_err(|e| self.write_err(e))?;
        }
        outcome.written = to_write.len();
        debug!(
            path = %self.path.display(),
            written = outcome.written,
            skipped = outcome.skipped.len(),
            "appended entries"
        );
        Ok(outcome)
    }
}
