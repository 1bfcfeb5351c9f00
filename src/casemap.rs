//! IRC case-mapping functions.
//!
//! IRC uses a special case-insensitive comparison where some characters
//! are considered equivalent (e.g., `[` and `{`). The mapping in effect is
//! announced by the server through the `CASEMAPPING` ISUPPORT token;
//! `rfc1459` is the most common and the default here.

use std::str::FromStr;

use serde::Deserialize;

/// A server case mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseMapping {
    /// Only `A-Z` fold to `a-z`.
    Ascii,
    /// ASCII plus `[]\~` folding to `{}|^`.
    #[default]
    Rfc1459,
    /// ASCII plus `[]\` folding to `{}|`.
    StrictRfc1459,
}

impl CaseMapping {
    /// Fold a single character to lowercase under this mapping.
    #[inline]
    pub fn to_lower(self, c: char) -> char {
        match (self, c) {
            (_, 'A'..='Z') => c.to_ascii_lowercase(),
            (Self::Ascii, _) => c,
            (_, '[') => '{',
            (_, ']') => '}',
            (_, '\\') => '|',
            (Self::Rfc1459, '~') => '^',
            _ => c,
        }
    }

    /// Fold a single character to uppercase under this mapping.
    #[inline]
    pub fn to_upper(self, c: char) -> char {
        match (self, c) {
            (_, 'a'..='z') => c.to_ascii_uppercase(),
            (Self::Ascii, _) => c,
            (_, '{') => '[',
            (_, '}') => ']',
            (_, '|') => '\\',
            (Self::Rfc1459, '^') => '~',
            _ => c,
        }
    }

    /// Lowercase a whole string.
    pub fn lower(self, s: &str) -> String {
        s.chars().map(|c| self.to_lower(c)).collect()
    }

    /// Uppercase a whole string.
    pub fn upper(self, s: &str) -> String {
        s.chars().map(|c| self.to_upper(c)).collect()
    }

    /// Compare two strings case-insensitively.
    pub fn equals(self, a: &str, b: &str) -> bool {
        a.len() == b.len()
            && a
                .chars()
                .zip(b.chars())
                .all(|(ca, cb)| self.to_lower(ca) == self.to_lower(cb))
    }
}

impl FromStr for CaseMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "rfc1459" => Ok(Self::Rfc1459),
            "strict-rfc1459" => Ok(Self::StrictRfc1459),
            other => Err(format!("unknown case mapping: {}", other)),
        }
    }
}

/// Convert a string to IRC lowercase using RFC 1459 case mapping.
pub fn irc_to_lower(s: &str) -> String {
    CaseMapping::Rfc1459.lower(s)
}

/// Convert a string to IRC uppercase using RFC 1459 case mapping.
pub fn irc_to_upper(s: &str) -> String {
    CaseMapping::Rfc1459.upper(s)
}

/// Compare two strings using RFC 1459 case-insensitive comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    CaseMapping::Rfc1459.equals(a, b)
}
