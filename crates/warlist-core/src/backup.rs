//! Pre-write backups and the undo path.
//!
//! Every backup is a timestamped sibling copy of the store file. The path
//! of the newest backup is written to a `.last_backup` sidecar next to the
//! store so undo survives process restarts; a [`Session`] keeps the same
//! path in memory as a fallback for when the sidecar cannot be read back.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// In-process record of the most recent backup.
#[derive(Debug, Clone, Default)]
pub struct Session {
    last_backup: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_backup(&self) -> Option<&Path> {
        self.last_backup.as_deref()
    }
}

/// Copy the store to a timestamped sibling and record it.
///
/// The copy lands next to `path` as `<name>.bak_<YYYYMMDD_HHMMSS>`; the
/// sidecar and the session both point at it afterwards. Fails if the store
/// cannot be read or the copy cannot be written.
pub fn create_backup(session: &mut Session, path: &Path) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let name = file_name(path);
    let backup_path = path.with_file_name(format!("{name}.bak_{stamp}"));

    fs::copy(path, &backup_path).map_err(|source| Error::Backup {
        path: path.to_path_buf(),
        source,
    })?;

    // Sidecar holds the absolute path so undo works from any working
    // directory.
    let recorded = fs::canonicalize(&backup_path).unwrap_or_else(|_| backup_path.clone());
    fs::write(sidecar_path(path), format!("{}\n", recorded.display())).map_err(|source| {
        Error::Backup {
            path: path.to_path_buf(),
            source,
        }
    })?;

    session.last_backup = Some(recorded.clone());
    info!(backup = %recorded.display(), "created backup");
    Ok(recorded)
}

/// Resolve the backup an undo would restore from.
///
/// The sidecar is consulted first, then the session. Fails with
/// [`Error::NotFound`] if the store itself is missing and
/// [`Error::NoBackup`] if neither source points at an existing file.
pub fn find_backup(session: &Session, path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    read_sidecar(path)
        .or_else(|| {
            session
                .last_backup()
                .filter(|p| p.exists())
                .map(Path::to_path_buf)
        })
        .ok_or_else(|| Error::NoBackup(path.to_path_buf()))
}

/// Restore the store from its most recent backup.
///
/// The backup is copied over the store verbatim and kept afterwards, so a
/// second undo restores the same state again. Returns the backup used.
pub fn undo(session: &Session, path: &Path) -> Result<PathBuf> {
    let backup_path = find_backup(session, path)?;
    fs::copy(&backup_path, path)?;
    info!(
        store = %path.display(),
        backup = %backup_path.display(),
        "restored store from backup"
    );
    Ok(backup_path)
}

fn sidecar_path(path: &Path) -> PathBuf {
    let name = file_name(path);
    path.with_file_name(format!("{name}.last_backup"))
}

fn read_sidecar(path: &Path) -> Option<PathBuf> {
    let sidecar = sidecar_path(path);
    let contents = match fs::read_to_string(&sidecar) {
        Ok(contents) => contents,
        Err(err) => {
            debug!(sidecar = %sidecar.display(), %err, "no readable sidecar");
            return None;
        }
    };
    let recorded = PathBuf::from(contents.trim());
    if recorded.as_os_str().is_empty() || !recorded.exists() {
        return None;
    }
    Some(recorded)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_else(|| path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn backup_copies_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("warlist.cfg");
        fs::write(&store, "add_war_entry \"enemy\" \"Foo\" \"\" \"\"\n").unwrap();

        let mut session = Session::new();
        let backup = create_backup(&mut session, &store).unwrap();

        assert!(backup.file_name().unwrap().to_string_lossy().contains(".bak_"));
        assert_eq!(
            fs::read_to_string(&backup).unwrap(),
            fs::read_to_string(&store).unwrap()
        );
        assert_eq!(session.last_backup(), Some(backup.as_path()));
        let sidecar = fs::read_to_string(dir.path().join("warlist.cfg.last_backup")).unwrap();
        assert_eq!(PathBuf::from(sidecar.trim()), backup);
    }

    #[test]
    fn backup_of_missing_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();
        let err = create_backup(&mut session, &dir.path().join("gone.cfg")).unwrap_err();
        assert!(matches!(err, Error::Backup { .. }));
        assert!(session.last_backup().is_none());
    }

    #[test]
    fn undo_restores_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("warlist.cfg");
        fs::write(&store, "original\n").unwrap();

        let mut session = Session::new();
        create_backup(&mut session, &store).unwrap();
        fs::write(&store, "original\nmutated\n").unwrap();

        undo(&session, &store).unwrap();
        assert_eq!(fs::read_to_string(&store).unwrap(), "original\n");
        // The backup survives, so undo can run again.
        undo(&session, &store).unwrap();
        assert_eq!(fs::read_to_string(&store).unwrap(), "original\n");
    }

    #[test]
    fn undo_without_store_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = undo(&Session::new(), &dir.path().join("gone.cfg")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn undo_without_backup_reports_no_backup() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("warlist.cfg");
        fs::write(&store, "contents\n").unwrap();

        let err = undo(&Session::new(), &store).unwrap_err();
        assert!(matches!(err, Error::NoBackup(_)));
        assert_eq!(fs::read_to_string(&store).unwrap(), "contents\n");
    }

    #[test]
    fn session_backs_up_a_deleted_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("warlist.cfg");
        fs::write(&store, "original\n").unwrap();

        let mut session = Session::new();
        create_backup(&mut session, &store).unwrap();
        fs::remove_file(dir.path().join("warlist.cfg.last_backup")).unwrap();
        fs::write(&store, "mutated\n").unwrap();

        undo(&session, &store).unwrap();
        assert_eq!(fs::read_to_string(&store).unwrap(), "original\n");
    }

    #[test]
    fn newest_backup_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("warlist.cfg");
        fs::write(&store, "one\n").unwrap();

        let mut session = Session::new();
        create_backup(&mut session, &store).unwrap();
        fs::write(&store, "two\n").unwrap();
        // Timestamps have second precision; make sure the names differ.
        sleep(Duration::from_millis(1100));
        create_backup(&mut session, &store).unwrap();
        fs::write(&store, "three\n").unwrap();

        undo(&session, &store).unwrap();
        assert_eq!(fs::read_to_string(&store).unwrap(), "two\n");
    }
}
