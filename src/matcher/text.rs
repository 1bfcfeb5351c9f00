//! Filters on message text.
//!
//! [`TextMatch`] reads the connection's command prefix and hands it to a
//! [`TextComparison`] together with the event text. Three comparisons are
//! provided: exact words ([`TextStatic`]), wildcard patterns
//! ([`TextWildcard`]) and regular expressions ([`TextRegex`]).

use std::fmt;

use regex::Regex;

use super::Match;
use crate::event::Event;

/// What to do with the command prefix before comparing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrefixRule {
    /// Compare the text as is.
    #[default]
    None,
    /// The text must start with the prefix, which is then removed.
    Required,
    /// The prefix is removed when present.
    Optional,
}

impl PrefixRule {
    /// The part of `text` left to compare, or `None` if it cannot match.
    pub fn apply<'t>(self, prefix: &str, text: &'t str) -> Option<&'t str> {
        match self {
            Self::None => Some(text),
            Self::Required => text.strip_prefix(prefix),
            Self::Optional => Some(text.strip_prefix(prefix).unwrap_or(text)),
        }
    }
}

/// Compares event text, given the command prefix in effect.
pub trait TextComparison: Send + Sync + fmt::Debug {
    fn compare(&self, prefix: &str, text: &str) -> bool;
}

/// Runs a [`TextComparison`] against events carrying text.
#[derive(Debug, Clone)]
pub struct TextMatch<C> {
    comparison: C,
}

impl<C: TextComparison> TextMatch<C> {
    pub fn new(comparison: C) -> Self {
        Self { comparison }
    }

    pub fn comparison(&self) -> &C {
        &self.comparison
    }
}

impl<C: TextComparison> Match for TextMatch<C> {
    fn matches(&self, event: &Event) -> bool {
        let Some(text) = event.text() else {
            return false;
        };
        let config = event.connection().config();
        self.comparison.compare(&config.commands_prefix, text.as_str())
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Matches a fixed sequence of words.
///
/// Leading whitespace is ignored, inner runs of whitespace count as a
/// single space and ASCII case is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStatic {
    pattern: String,
    rule: PrefixRule,
}

impl TextStatic {
    pub fn new(pattern: &str, rule: PrefixRule) -> Self {
        Self {
            pattern: collapse(pattern),
            rule,
        }
    }
}

impl TextComparison for TextStatic {
    fn compare(&self, prefix: &str, text: &str) -> bool {
        self.rule
            .apply(prefix, text.trim_start())
            .map_or(false, |rest| collapse(rest).eq_ignore_ascii_case(&self.pattern))
    }
}

/// Matches a wildcard pattern.
///
/// `*` matches any run of characters, `?` exactly one character and `&`
/// exactly one word. Whitespace is collapsed on both sides and matching is
/// case-insensitive.
#[derive(Debug, Clone)]
pub struct TextWildcard {
    pattern: String,
    regex: Regex,
    rule: PrefixRule,
}

impl TextWildcard {
    pub fn new(pattern: &str, rule: PrefixRule) -> Result<Self, regex::Error> {
        let pattern = collapse(pattern);
        let mut translated = String::with_capacity(pattern.len() * 2 + 8);
        translated.push_str("(?is)^");
        for c in pattern.chars() {
            match c {
                '*' => translated.push_str(".*"),
                '?' => translated.push('.'),
                '&' => translated.push_str(r"\S+"),
                _ => translated.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        translated.push('$');

        Ok(Self {
            regex: Regex::new(&translated)?,
            pattern,
            rule,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl TextComparison for TextWildcard {
    fn compare(&self, prefix: &str, text: &str) -> bool {
        self.rule
            .apply(prefix, text.trim_start())
            .map_or(false, |rest| self.regex.is_match(&collapse(rest)))
    }
}

/// Matches a regular expression anywhere in the text.
#[derive(Debug, Clone)]
pub struct TextRegex {
    regex: Regex,
    rule: PrefixRule,
}

impl TextRegex {
    pub fn new(pattern: &str, rule: PrefixRule) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            rule,
        })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl TextComparison for TextRegex {
    fn compare(&self, prefix: &str, text: &str) -> bool {
        self.rule
            .apply(prefix, text)
            .map_or(false, |rest| self.regex.is_match(rest))
    }
}
