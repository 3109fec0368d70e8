//! Nickname safety checks.
//!
//! DDNet allows almost anything in a nickname, so the filter is
//! deliberately narrow: it only rejects empty names, names over the length
//! cap, and names carrying category-C code points (control, format,
//! unassigned, private use) that would corrupt the config or render
//! invisibly.

use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::models::Entry;

/// Maximum accepted nickname length, in characters.
pub const NICK_MAX_LEN: usize = 64;

/// Check a nickname for safe persistence.
///
/// The name is trimmed first; the trimmed form must be non-empty, at most
/// [`NICK_MAX_LEN`] characters, and free of category-C code points.
///
/// ```
/// use warlist_core::validate::is_safe_nick;
///
/// assert!(is_safe_nick("nameless tee"));
/// assert!(!is_safe_nick("bad\u{7}beep"));
/// assert!(!is_safe_nick("   "));
/// ```
pub fn is_safe_nick(nick: &str) -> bool {
    let nick = nick.trim();
    if nick.is_empty() || nick.chars().count() > NICK_MAX_LEN {
        return false;
    }
    !nick.chars().any(is_category_c)
}

/// Split candidates into writable entries and rejected nicks.
///
/// Entries with an empty nick (clan-only markers) pass through untouched;
/// the safety check only applies where a nick is present.
pub fn partition_safe(entries: &[Entry]) -> (Vec<Entry>, Vec<String>) {
    let mut valid = Vec::with_capacity(entries.len());
    let mut invalid = Vec::new();
    for entry in entries {
        if !entry.nick.is_empty() && !is_safe_nick(&entry.nick) {
            invalid.push(entry.nick.clone());
        } else {
            valid.push(entry.clone());
        }
    }
    (valid, invalid)
}

/// General category group C: Cc, Cf, Cn, and Co.
fn is_category_c(c: char) -> bool {
    c.general_category_group() == GeneralCategoryGroup::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_nicks() {
        assert!(is_safe_nick("oxy"));
        assert!(is_safe_nick("nameless tee"));
        assert!(is_safe_nick("Ап4к"));
        assert!(is_safe_nick("^w^"));
        // Surrounding whitespace is trimmed away, not rejected.
        assert!(is_safe_nick("  padded  "));
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert!(!is_safe_nick(""));
        assert!(!is_safe_nick("   \t "));
    }

    #[test]
    fn enforces_length_cap_in_characters() {
        let max = "я".repeat(NICK_MAX_LEN);
        assert!(is_safe_nick(&max));
        assert!(!is_safe_nick(&format!("{max}я")));
        // The cap applies after trimming.
        assert!(is_safe_nick(&format!("  {max}  ")));
    }

    #[test]
    fn rejects_control_format_and_private_use() {
        assert!(!is_safe_nick("bee\u{7}p"));
        assert!(!is_safe_nick("del\u{7F}ete"));
        assert!(!is_safe_nick("zero\u{200B}width"));
        assert!(!is_safe_nick("bidi\u{202E}flip"));
        assert!(!is_safe_nick("priv\u{E123}ate"));
        assert!(!is_safe_nick("\u{FEFF}bom"));
    }

    #[test]
    fn rejects_unassigned_code_points() {
        // U+0378 and U+2065 are reserved gaps, category Cn.
        assert!(!is_safe_nick("gap\u{0378}fill"));
        assert!(!is_safe_nick("hole\u{2065}"));
    }

    #[test]
    fn partition_keeps_clan_only_entries() {
        let entries = vec![
            Entry::new("oxy", "", "camping"),
            Entry::new("", "WAR", "clan feud"),
            Entry::new("bad\u{7}", "", ""),
        ];
        let (valid, invalid) = partition_safe(&entries);
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[1].clan, "WAR");
        assert_eq!(invalid, ["bad\u{7}"]);
    }
}
