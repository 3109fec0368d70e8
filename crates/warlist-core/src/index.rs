//! Duplicate detection against existing text store contents.

use std::collections::HashSet;

use tracing::trace;

use crate::models::EntryKey;
use crate::quoting::tokenize;

/// Command keyword opening every war entry line.
pub const ENTRY_KEYWORD: &str = "add_war_entry";

/// Scan raw config text into the set of entry keys already present.
///
/// Only lines starting with [`ENTRY_KEYWORD`] are considered. A line that
/// fails to tokenize or carries fewer than four tokens never aborts the
/// scan; it is simply not counted as existing.
pub fn scan_existing(text: &str) -> HashSet<EntryKey> {
    let mut existing = HashSet::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || !line.starts_with(ENTRY_KEYWORD) {
            continue;
        }
        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                trace!(%err, line, "skipping malformed entry line");
                continue;
            }
        };
        if tokens.len() >= 4 && tokens[0] == ENTRY_KEYWORD {
            existing.insert(EntryKey::new(&tokens[1], &tokens[2], &tokens[3]));
        }
    }
    existing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_wellformed_lines() {
        let text = "\
add_war_entry \"enemy\" \"Foo\" \"\" \"aim\"
add_war_entry \"team\" \"Bar\" \"WAR\" \"\"
";
        let existing = scan_existing(text);
        assert_eq!(existing.len(), 2);
        assert!(existing.contains(&EntryKey::new("enemy", "foo", "")));
        assert!(existing.contains(&EntryKey::new("team", "BAR", "war")));
    }

    #[test]
    fn ignores_unrelated_and_malformed_lines() {
        let text = "\
# warlist config
add_friend \"buddy\"

add_war_entry \"enemy\" \"broken
add_war_entry \"enemy\" \"short\"
add_war_entryx \"enemy\" \"x\" \"y\" \"z\"
  add_war_entry \"enemy\" \"Indented\" \"\" \"\"
";
        let existing = scan_existing(text);
        assert_eq!(existing.len(), 1);
        assert!(existing.contains(&EntryKey::new("enemy", "indented", "")));
    }

    #[test]
    fn membership_is_case_insensitive_on_nick_and_clan() {
        let existing = scan_existing("add_war_entry \"enemy\" \"Foo\" \"Cln\" \"\"\n");
        assert!(existing.contains(&EntryKey::new("enemy", "FOO", "CLN")));
        assert!(!existing.contains(&EntryKey::new("Enemy", "foo", "cln")));
    }

    #[test]
    fn empty_input_yields_empty_index() {
        assert!(scan_existing("").is_empty());
    }
}
