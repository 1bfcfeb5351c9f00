//! Text helpers for bot modules.
//!
//! # IRC Format Codes
//! - 0x02 (^B): Bold
//! - 0x03 (^C): Color (followed by optional foreground,background)
//! - 0x0F (^O): Reset all formatting
//! - 0x16 (^V): Reverse/Inverse
//! - 0x1D (^]): Italic
//! - 0x1F (^_): Underline

use std::borrow::Cow;
use std::iter::Peekable;
use std::ops::BitOr;
use std::str::Chars;

#[cfg(feature = "encoding")]
use crate::error::EncodingError;

/// Which formatting codes [`strip_codes`] removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StripFlags(u8);

impl StripFlags {
    pub const BOLD: Self = Self(1);
    pub const COLORS: Self = Self(1 << 1);
    pub const RESET: Self = Self(1 << 2);
    pub const REVERSE: Self = Self(1 << 3);
    pub const UNDERLINE: Self = Self(1 << 4);
    pub const ITALIC: Self = Self(1 << 5);
    pub const ALL: Self = Self(0b11_1111);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    fn for_code(c: char) -> Option<Self> {
        match c {
            '\x02' => Some(Self::BOLD),
            '\x03' => Some(Self::COLORS),
            '\x0F' => Some(Self::RESET),
            '\x16' => Some(Self::REVERSE),
            '\x1D' => Some(Self::ITALIC),
            '\x1F' => Some(Self::UNDERLINE),
            _ => None,
        }
    }
}

impl Default for StripFlags {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for StripFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Skip up to two digits.
fn skip_digits(chars: &mut Peekable<Chars<'_>>) -> usize {
    let mut n = 0;
    while n < 2 && chars.next_if(|c| c.is_ascii_digit()).is_some() {
        n += 1;
    }
    n
}

/// Remove IRC formatting codes selected by `flags`.
///
/// Color codes take their `fg[,bg]` arguments with them. A comma that is
/// not followed by a digit belongs to the text.
///
/// # Examples
///
/// ```
/// use erebot_core::util::{strip_codes, StripFlags};
///
/// assert_eq!(strip_codes("\x02bold\x02 \x0304,01red\x03", StripFlags::ALL), "bold red");
/// assert_eq!(strip_codes("\x02bold\x02", StripFlags::COLORS), "\x02bold\x02");
/// assert_eq!(strip_codes("\x034,text", StripFlags::ALL), ",text");
/// ```
pub fn strip_codes(text: &str, flags: StripFlags) -> Cow<'_, str> {
    let has_codes = text
        .chars()
        .any(|c| StripFlags::for_code(c).map_or(false, |f| flags.contains(f)));
    if !has_codes {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match StripFlags::for_code(c) {
            Some(StripFlags::COLORS) if flags.contains(StripFlags::COLORS) => {
                if skip_digits(&mut chars) > 0 {
                    let mut ahead = chars.clone();
                    if ahead.next() == Some(',') && ahead.peek().map_or(false, char::is_ascii_digit) {
                        chars.next();
                        skip_digits(&mut chars);
                    }
                }
            }
            Some(f) if flags.contains(f) => {}
            _ => out.push(c),
        }
    }

    Cow::Owned(out)
}

/// Decode `bytes` to UTF-8.
///
/// Valid UTF-8 is returned as is; anything else is decoded from `charset`
/// (any label known to the WHATWG encoding standard), with undecodable
/// sequences replaced by U+FFFD.
#[cfg(feature = "encoding")]
#[cfg_attr(docsrs, doc(cfg(feature = "encoding")))]
pub fn to_utf8<'a>(bytes: &'a [u8], charset: &str) -> Result<Cow<'a, str>, EncodingError> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(Cow::Borrowed(text));
    }
    let encoding = encoding::Encoding::for_label(charset.trim().as_bytes())
        .ok_or_else(|| EncodingError::UnknownCharset(charset.to_owned()))?;
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    Ok(text)
}

/// Format a byte count with binary (IEC) units.
///
/// # Examples
///
/// ```
/// use erebot_core::util::human_size;
///
/// assert_eq!(human_size(512), "512 B");
/// assert_eq!(human_size(1536), "1.5 KiB");
/// assert_eq!(human_size(1024 * 1024), "1 MiB");
/// ```
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(strip_codes("plain", StripFlags::ALL), Cow::Borrowed("plain")));
        assert!(matches!(
            strip_codes("\x02bold", StripFlags::COLORS),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_strip_each_code() {
        assert_eq!(strip_codes("\x02b\x02", StripFlags::BOLD), "b");
        assert_eq!(strip_codes("\x1Fu\x1F", StripFlags::UNDERLINE), "u");
        assert_eq!(strip_codes("\x1Di\x1D", StripFlags::ITALIC), "i");
        assert_eq!(strip_codes("\x16r\x16", StripFlags::REVERSE), "r");
        assert_eq!(strip_codes("a\x0Fb", StripFlags::RESET), "ab");
    }

    #[test]
    fn test_selective_strip() {
        let text = "\x02\x1Fboth\x1F\x02";
        assert_eq!(strip_codes(text, StripFlags::BOLD), "\x1Fboth\x1F");
        assert_eq!(strip_codes(text, StripFlags::BOLD | StripFlags::UNDERLINE), "both");
    }

    #[test]
    fn test_colors() {
        assert_eq!(strip_codes("\x0312blue", StripFlags::ALL), "blue");
        assert_eq!(strip_codes("\x031,2x", StripFlags::ALL), "x");
        assert_eq!(strip_codes("\x0301,02x", StripFlags::ALL), "x");
        assert_eq!(strip_codes("\x03123", StripFlags::ALL), "3");
        assert_eq!(strip_codes("\x03,5x", StripFlags::ALL), ",5x");
        assert_eq!(strip_codes("a\x03", StripFlags::ALL), "a");
        assert_eq!(strip_codes("\x035,", StripFlags::ALL), ",");
    }

    #[test]
    fn test_unicode_survives() {
        assert_eq!(strip_codes("\x02héllo\x02 👋", StripFlags::ALL), "héllo 👋");
    }

    #[cfg(feature = "encoding")]
    #[test]
    fn test_to_utf8() {
        assert_eq!(to_utf8(b"caf\xc3\xa9", "iso-8859-1").unwrap(), "café");
        assert_eq!(to_utf8(b"caf\xe9", "iso-8859-1").unwrap(), "café");
        assert_eq!(to_utf8(b"caf\xe9", "ISO-8859-15").unwrap(), "café");
        assert!(matches!(
            to_utf8(b"caf\xe9", "no-such-charset"),
            Err(EncodingError::UnknownCharset(_))
        ));
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1024), "1 KiB");
        assert_eq!(human_size(1126), "1.1 KiB");
        assert_eq!(human_size(1_288_490_189), "1.2 GiB");
        assert_eq!(human_size(u64::MAX), "16 EiB");
    }
}
