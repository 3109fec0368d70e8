//! Shared data types for the war list.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Target group of a war entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Enemy,
    Team,
}

impl Group {
    /// Group token as written into the text config.
    pub fn as_str(self) -> &'static str {
        match self {
            Group::Enemy => "enemy",
            Group::Team => "team",
        }
    }

    /// Numeric `state` column value used by the SQLite store.
    pub fn state(self) -> i64 {
        match self {
            Group::Enemy => 1,
            Group::Team => 3,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match fold(s.trim()).as_str() {
            "enemy" => Ok(Group::Enemy),
            "team" => Ok(Group::Team),
            other => Err(Error::Validation(format!(
                "unknown group {other:?}, expected \"enemy\" or \"team\""
            ))),
        }
    }
}

/// A single candidate entry as submitted by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub nick: String,
    pub clan: String,
    pub reason: String,
}

impl Entry {
    pub fn new(
        nick: impl Into<String>,
        clan: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            nick: nick.into(),
            clan: clan.into(),
            reason: reason.into(),
        }
    }
}

/// Identity of a persisted entry, used for duplicate detection.
///
/// Nick and clan are compared case-insensitively, the group token verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    group: String,
    nick: String,
    clan: String,
}

impl EntryKey {
    /// Build a key from raw line tokens.
    pub fn new(group: &str, nick: &str, clan: &str) -> Self {
        Self {
            group: group.to_string(),
            nick: fold(nick),
            clan: fold(clan),
        }
    }

    /// Key a candidate entry would occupy under `group`.
    pub fn of(group: Group, entry: &Entry) -> Self {
        Self::new(group.as_str(), &entry.nick, &entry.clan)
    }
}

/// Locale-naive lowercasing used for all case-insensitive comparison.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_tokens_and_states() {
        assert_eq!(Group::Enemy.as_str(), "enemy");
        assert_eq!(Group::Team.as_str(), "team");
        assert_eq!(Group::Enemy.state(), 1);
        assert_eq!(Group::Team.state(), 3);
    }

    #[test]
    fn group_parses_loosely() {
        assert_eq!(" Enemy ".parse::<Group>().unwrap(), Group::Enemy);
        assert_eq!("TEAM".parse::<Group>().unwrap(), Group::Team);
        assert!("ally".parse::<Group>().is_err());
    }

    #[test]
    fn key_folds_nick_and_clan_only() {
        let a = EntryKey::new("enemy", "Foo", "BAR");
        let b = EntryKey::new("enemy", "foo", "bar");
        let c = EntryKey::new("Enemy", "foo", "bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn key_of_entry_matches_token_key() {
        let entry = Entry::new("Frost", "WAR", "camping");
        assert_eq!(
            EntryKey::of(Group::Team, &entry),
            EntryKey::new("team", "frost", "war")
        );
    }
}
