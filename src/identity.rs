//! Identities of message sources.
//!
//! An identity is the `nick!ident@host` triple found in the prefix of
//! an IRC message. Servers only send the parts they know about, so every
//! part except the nickname is optional.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::fmt;
use std::str::FromStr;

use crate::casemap::CaseMapping;

/// The `nick!ident@host` source of an event.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    nick: String,
    ident: Option<String>,
    host: Option<String>,
}

impl Identity {
    /// Parse an identity string.
    ///
    /// This is a lenient parser: `nick`, `nick@host`, `nick!ident` and
    /// `nick!ident@host` are all accepted, and server names end up as the
    /// nickname.
    pub fn new_from_str(s: &str) -> Self {
        #[derive(Copy, Clone, Eq, PartialEq)]
        enum Part {
            Nick,
            Ident,
            Host,
        }

        let mut nick = String::new();
        let mut ident: Option<String> = None;
        let mut host: Option<String> = None;
        let mut part = Part::Nick;

        for c in s.chars() {
            match c {
                '!' if part == Part::Nick => {
                    part = Part::Ident;
                    ident = Some(String::new());
                }
                '@' if part != Part::Host => {
                    part = Part::Host;
                    host = Some(String::new());
                }
                _ => match part {
                    Part::Nick => nick.push(c),
                    Part::Ident => ident.get_or_insert_with(String::new).push(c),
                    Part::Host => host.get_or_insert_with(String::new).push(c),
                },
            }
        }

        Self {
            nick,
            ident: ident.filter(|s| !s.is_empty()),
            host: host.filter(|s| !s.is_empty()),
        }
    }

    /// Build an identity from its parts.
    pub fn new(
        nick: impl Into<String>,
        ident: Option<impl Into<String>>,
        host: Option<impl Into<String>>,
    ) -> Self {
        Self {
            nick: nick.into(),
            ident: ident.map(Into::into),
            host: host.map(Into::into),
        }
    }

    /// The nickname (or server name).
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// The ident (username), if known.
    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    /// The hostname, if known.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Whether this looks like a server name rather than a user.
    pub fn is_server(&self) -> bool {
        self.ident.is_none() && self.host.is_none() && self.nick.contains('.')
    }

    /// Full `nick!ident@host` mask, with `*` for unknown parts.
    pub fn mask(&self) -> String {
        format!(
            "{}!{}@{}",
            self.nick,
            self.ident.as_deref().unwrap_or("*"),
            self.host.as_deref().unwrap_or("*")
        )
    }

    /// Match the full mask against a `*`/`?` wildcard pattern.
    ///
    /// A pattern without `!` or `@` is matched against the nickname only.
    pub fn is_match(&self, pattern: &str, casemap: CaseMapping) -> bool {
        if pattern.contains(['!', '@']) {
            wildcard_match(pattern, &self.mask(), casemap)
        } else {
            wildcard_match(pattern, &self.nick, casemap)
        }
    }
}

impl FromStr for Identity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new_from_str(s))
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new_from_str(s)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nick)?;
        if let Some(ident) = &self.ident {
            write!(f, "!{}", ident)?;
        }
        if let Some(host) = &self.host {
            write!(f, "@{}", host)?;
        }
        Ok(())
    }
}

/// Glob matching with `*` (any run) and `?` (one character).
fn wildcard_match(pattern: &str, text: &str, casemap: CaseMapping) -> bool {
    let pattern: Vec<char> = pattern.chars().map(|c| casemap.to_lower(c)).collect();
    let text: Vec<char> = text.chars().map(|c| casemap.to_lower(c)).collect();

    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
