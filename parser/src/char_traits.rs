//! Holds functions to determine if a character belongs to a specific character set.
//!
//! Every predicate takes an optional character so that callers can pass the
//! result of a lookahead directly; an absent character never belongs to any
//! set.

/// Check whether the character is a whitespace (` ` or `\t`).
#[inline]
#[must_use]
pub fn is_whitespace(c: Option<char>) -> bool {
    matches!(c, Some(' ' | '\t'))
}

/// Check whether the character is a line break (`\r` or `\n`).
#[inline]
#[must_use]
pub fn is_eol(c: Option<char>) -> bool {
    matches!(c, Some('\n' | '\r'))
}

/// Check whether the character is a whitespace or a line break.
///
/// ` `, `\t`, `\n`, `\r`
#[inline]
#[must_use]
pub fn is_whitespace_or_eol(c: Option<char>) -> bool {
    is_whitespace(c) || is_eol(c)
}

/// Check whether the character is a hexadecimal character (case insensitive).
#[inline]
#[must_use]
pub fn is_hex(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_ascii_hexdigit())
}
