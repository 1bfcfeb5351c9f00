//! Tokenized message text.
//!
//! Event text is wrapped into a [`TextWrapper`], which splits it into
//! whitespace-separated tokens while keeping the original string around so
//! that ranges of tokens come back with their original spacing.

use std::fmt;

/// Immutable text with word-level access.
///
/// # Example
///
/// ```
/// use erebot_core::TextWrapper;
///
/// let text = TextWrapper::new("!seen  some  nick");
/// assert_eq!(text.count_tokens(), 3);
/// assert_eq!(text.token(0), Some("!seen"));
/// assert_eq!(text.token(-1), Some("nick"));
/// assert_eq!(text.tokens(1, None), "some  nick");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextWrapper {
    text: String,
    spans: Vec<(usize, usize)>,
}

impl TextWrapper {
    /// Wrap `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut spans = Vec::new();
        let mut start: Option<usize> = None;

        for (i, c) in text.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(s)) => {
                    spans.push((s, i));
                    start = None;
                }
                (false, None) => start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = start {
            spans.push((s, text.len()));
        }

        Self { text, spans }
    }

    /// The wrapped text, verbatim.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of tokens.
    pub fn count_tokens(&self) -> usize {
        self.spans.len()
    }

    /// Token at `index`; negative indices count from the end.
    pub fn token(&self, index: isize) -> Option<&str> {
        let i = self.normalize(index)?;
        self.spans.get(i).map(|&(s, e)| &self.text[s..e])
    }

    /// A run of tokens, with the spacing between them preserved.
    ///
    /// `start` may be negative to count from the end. A `None` length takes
    /// every remaining token; a negative length leaves that many tokens out
    /// at the end. Out-of-range requests yield an empty string.
    pub fn tokens(&self, start: isize, len: Option<isize>) -> &str {
        let count = self.spans.len() as isize;
        let first = (if start < 0 { count + start } else { start }).clamp(0, count);
        let last = match len {
            None => count,
            Some(n) if n >= 0 => first.saturating_add(n).min(count),
            Some(n) => count + n,
        };

        if last <= first {
            return "";
        }
        let (s, _) = self.spans[first as usize];
        let (_, e) = self.spans[last as usize - 1];
        &self.text[s..e]
    }

    /// Iterate over the tokens.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans.iter().map(move |&(s, e)| &self.text[s..e])
    }

    fn normalize(&self, index: isize) -> Option<usize> {
        if index < 0 {
            self.spans.len().checked_sub(index.unsigned_abs())
        } else {
            Some(index as usize)
        }
    }
}

impl fmt::Display for TextWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for TextWrapper {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextWrapper {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for TextWrapper {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenization() {
        let text = TextWrapper::new("  hello   world \t again ");
        assert_eq!(text.count_tokens(), 3);
        assert_eq!(text.iter().collect::<Vec<_>>(), ["hello", "world", "again"]);
        assert_eq!(text.as_str(), "  hello   world \t again ");
    }

    #[test]
    fn test_empty_text() {
        let text = TextWrapper::new("");
        assert_eq!(text.count_tokens(), 0);
        assert_eq!(text.token(0), None);
        assert_eq!(text.tokens(0, None), "");
    }

    #[test]
    fn test_token_indices() {
        let text = TextWrapper::new("a b c");
        assert_eq!(text.token(2), Some("c"));
        assert_eq!(text.token(3), None);
        assert_eq!(text.token(-3), Some("a"));
        assert_eq!(text.token(-4), None);
    }

    #[test]
    fn test_token_ranges() {
        let text = TextWrapper::new("a  b c d");
        assert_eq!(text.tokens(0, None), "a  b c d");
        assert_eq!(text.tokens(0, Some(2)), "a  b");
        assert_eq!(text.tokens(1, Some(-1)), "b c");
        assert_eq!(text.tokens(-2, None), "c d");
        assert_eq!(text.tokens(3, Some(5)), "d");
        assert_eq!(text.tokens(4, None), "");
        assert_eq!(text.tokens(2, Some(0)), "");
        assert_eq!(text.tokens(-10, Some(1)), "a");
    }

    #[test]
    fn test_unicode() {
        let text = TextWrapper::new("héllo wörld");
        assert_eq!(text.token(1), Some("wörld"));
        assert_eq!(text.to_string(), "héllo wörld");
    }
}
