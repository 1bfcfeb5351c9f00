//! Filters on event kind and facets.

use super::Match;
use crate::event::{Event, EventKind, Facets};

/// Accepts events raised on a given channel.
///
/// Channel names are compared with the connection's case mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChanMatch {
    chan: String,
}

impl ChanMatch {
    pub fn new(chan: impl Into<String>) -> Self {
        Self { chan: chan.into() }
    }

    pub fn chan(&self) -> &str {
        &self.chan
    }
}

impl Match for ChanMatch {
    fn matches(&self, event: &Event) -> bool {
        event
            .chan()
            .map_or(false, |chan| event.connection().casemapping().equals(chan, &self.chan))
    }
}

/// Accepts events whose source matches a `nick!ident@host` mask.
///
/// A mask without `!` or `@` is matched against the nickname alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMatch {
    mask: String,
}

impl SourceMatch {
    pub fn new(mask: impl Into<String>) -> Self {
        Self { mask: mask.into() }
    }

    pub fn mask(&self) -> &str {
        &self.mask
    }
}

impl Match for SourceMatch {
    fn matches(&self, event: &Event) -> bool {
        event
            .source()
            .map_or(false, |source| source.is_match(&self.mask, event.connection().casemapping()))
    }
}

/// Accepts events of the listed kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindMatch {
    kinds: Vec<EventKind>,
}

impl KindMatch {
    pub fn new(kinds: impl IntoIterator<Item = EventKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn kinds(&self) -> &[EventKind] {
        &self.kinds
    }
}

impl Match for KindMatch {
    fn matches(&self, event: &Event) -> bool {
        self.kinds.contains(&event.kind())
    }
}

/// Accepts events carrying every facet in a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetMatch(pub Facets);

impl Match for FacetMatch {
    fn matches(&self, event: &Event) -> bool {
        event.has(self.0)
    }
}
