//! Turning raw form input into candidate entries.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::{fold, Entry};
use crate::quoting::tokenize;

/// Raw user input for one add operation.
#[derive(Debug, Clone)]
pub enum Submission {
    /// One nick, clan, and reason.
    Single {
        nick: String,
        clan: String,
        reason: String,
    },
    /// A tokenized nick list sharing one clan and reason.
    Multi {
        nicks: String,
        clan: String,
        reason: String,
    },
}

/// Expand a submission into candidate entries.
///
/// Fields are trimmed. When `supports_clan` is false the target store
/// has no clan field and any clan input is dropped before the rules below
/// apply.
///
/// Single submissions produce exactly one entry and require a nick or a
/// clan. Multi submissions tokenize the nick list with shell-like quoting
/// and keep each token exactly as written, quoted whitespace included;
/// empty tokens and case-insensitive repeats are dropped, with the first
/// spelling winning. The shared clan and reason apply to every entry; a
/// nick list and a shared clan cannot both be given, but a clan alone
/// produces one clan-only entry.
pub fn gather(submission: &Submission, supports_clan: bool) -> Result<Vec<Entry>> {
    match submission {
        Submission::Single { nick, clan, reason } => {
            let nick = nick.trim();
            let clan = if supports_clan { clan.trim() } else { "" };
            if nick.is_empty() && clan.is_empty() {
                return Err(Error::Validation(
                    "enter a nick or a clan for the entry".into(),
                ));
            }
            Ok(vec![Entry::new(nick, clan, reason.trim())])
        }
        Submission::Multi {
            nicks,
            clan,
            reason,
        } => {
            let nicks = nicks.trim();
            let clan = if supports_clan { clan.trim() } else { "" };
            let reason = reason.trim();
            if !nicks.is_empty() && !clan.is_empty() {
                return Err(Error::Validation(
                    "give either a nick list or a shared clan, not both".into(),
                ));
            }
            if nicks.is_empty() {
                if clan.is_empty() {
                    return Err(Error::Validation("the nick list is empty".into()));
                }
                return Ok(vec![Entry::new("", clan, reason)]);
            }
            let tokens = tokenize(nicks).map_err(|err| {
                Error::Validation(format!("could not parse the nick list: {err}"))
            })?;
            let mut seen = HashSet::new();
            let mut entries = Vec::new();
            for token in tokens {
                if token.is_empty() || !seen.insert(fold(&token)) {
                    continue;
                }
                entries.push(Entry::new(token, clan, reason));
            }
            if entries.is_empty() {
                return Err(Error::Validation("no usable nicks in the list".into()));
            }
            Ok(entries)
        }
    }
}
