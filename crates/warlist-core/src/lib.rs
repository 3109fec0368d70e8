//! Core library for warlist, a war list manager for DDNet TaterClient.
//!
//! Everything frontends need lives here: the entry model, field quoting,
//! nick validation, submission gathering, the two persistence backends,
//! pre-write backups with undo, and the release update check.

pub mod backup;
pub mod error;
pub mod gather;
pub mod index;
pub mod models;
pub mod quoting;
pub mod store;
pub mod update;
pub mod validate;

pub use backup::{create_backup, find_backup, undo, Session};
pub use error::{Error, Result};
pub use gather::{gather, Submission};
pub use models::{Entry, EntryKey, Group};
pub use store::{
    AppendOutcome, SqliteStore, StoreKind, StorePreview, TextStore, WarStore,
};
pub use update::{CheckOutcome, Release};
pub use validate::{is_safe_nick, NICK_MAX_LEN};
