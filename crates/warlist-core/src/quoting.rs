//! Shell-style quoting for `add_war_entry` config lines.
//!
//! [`quote`] and [`tokenize`] are inverses: a field quoted here always
//! survives a round trip through the tokenizer unchanged, including empty
//! strings, embedded quotes, and backslashes.

use crate::error::{Error, Result};

/// Quote a field for a config line.
///
/// Backslashes and double quotes are escaped and the result is wrapped in
/// double quotes.
///
/// ```
/// use warlist_core::quoting::quote;
///
/// assert_eq!(quote("oxy"), "\"oxy\"");
/// assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
/// assert_eq!(quote(""), "\"\"");
/// ```
pub fn quote(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for c in field.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Split a line into tokens using shell-like rules.
///
/// Unquoted whitespace separates tokens. Double quotes group text and honor
/// `\"` and `\\` escapes, single quotes group text verbatim, and a backslash
/// outside quotes escapes the next character. Adjacent quoted and unquoted
/// pieces join into one token.
///
/// Fails on an unterminated quote or a trailing backslash.
///
/// ```
/// use warlist_core::quoting::tokenize;
///
/// let tokens = tokenize(r#"KIRUSI Questal "I miss her""#).unwrap();
/// assert_eq!(tokens, ["KIRUSI", "Questal", "I miss her"]);
/// ```
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_ascii_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(unterminated()),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            // Only the quote and the backslash itself are
                            // special inside double quotes.
                            Some(e @ ('"' | '\\')) => current.push(e),
                            Some(e) => {
                                current.push('\\');
                                current.push(e);
                            }
                            None => return Err(unterminated()),
                        },
                        Some(c) => current.push(c),
                        None => return Err(unterminated()),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(e) => current.push(e),
                    None => {
                        return Err(Error::Validation(
                            "line ends with a dangling escape".into(),
                        ))
                    }
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn unterminated() -> Error {
    Error::Validation("no closing quotation".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(split("a b\tc"), ["a", "b", "c"]);
        assert_eq!(split("  spaced   out  "), ["spaced", "out"]);
        assert!(split("").is_empty());
        assert!(split("   \t ").is_empty());
    }

    #[test]
    fn double_quotes_group_and_escape() {
        assert_eq!(split(r#""multi word" token"#), ["multi word", "token"]);
        assert_eq!(split(r#""say \"hi\"""#), [r#"say "hi""#]);
        assert_eq!(split(r#""back\\slash""#), [r"back\slash"]);
        // Backslash before an ordinary character stays literal.
        assert_eq!(split(r#""a\qb""#), [r"a\qb"]);
    }

    #[test]
    fn single_quotes_are_verbatim() {
        assert_eq!(split(r#"'no \escapes "here"'"#), [r#"no \escapes "here""#]);
    }

    #[test]
    fn empty_quotes_yield_empty_token() {
        assert_eq!(split(r#""""#), [""]);
        assert_eq!(split("''"), [""]);
        assert_eq!(split(r#"a "" b"#), ["a", "", "b"]);
    }

    #[test]
    fn adjacent_pieces_concatenate() {
        assert_eq!(split(r#""a"b"#), ["ab"]);
        assert_eq!(split(r#"a"b c"d"#), ["ab cd"]);
        assert_eq!(split("a'b'c"), ["abc"]);
    }

    #[test]
    fn bare_backslash_escapes_next_char() {
        assert_eq!(split(r"a\ b"), ["a b"]);
        assert_eq!(split("\\\""), ["\""]);
        assert_eq!(split(r"\'"), ["'"]);
    }

    #[test]
    fn unterminated_input_fails() {
        assert!(tokenize(r#""open"#).is_err());
        assert!(tokenize("'open").is_err());
        assert!(tokenize(r"trailing\").is_err());
        assert!(tokenize(r#""trailing\"#).is_err());
    }

    #[test]
    fn quote_round_trips_through_tokenize() {
        let fields = [
            "",
            "plain",
            "two words",
            "with \"quotes\"",
            r"back\slash",
            r#"mix \" of 'everything' \\"#,
            "tab\tand\nnewline",
            "юникод ник",
        ];
        for field in fields {
            assert_eq!(split(&quote(field)), [field], "field {field:?}");
        }
        let line = format!("{} {} {}", quote("enemy"), quote("Foo Bar"), quote(""));
        assert_eq!(split(&line), ["enemy", "Foo Bar", ""]);
    }
}
