//! Event filters.
//!
//! A filter decides whether an [`EventHandler`](crate::EventHandler) cares
//! about an event. Filters compose through [`Collection`] (all/any of a set)
//! and [`MatchNot`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use erebot_core::matcher::{ChanMatch, Collection, Match, PrefixRule, TextMatch, TextStatic};
//!
//! let command: Arc<dyn Match> = Arc::new(TextMatch::new(TextStatic::new("help", PrefixRule::Required)));
//! let filter = Collection::all();
//! assert!(filter.add(Arc::new(ChanMatch::new("#rust"))));
//! assert!(filter.add(Arc::clone(&command)));
//! assert!(!filter.add(command));
//! assert_eq!(filter.len(), 2);
//! ```

mod simple;
mod text;

pub use self::simple::{ChanMatch, FacetMatch, KindMatch, SourceMatch};
pub use self::text::{PrefixRule, TextComparison, TextMatch, TextRegex, TextStatic, TextWildcard};

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::event::Event;

/// An event filter.
pub trait Match: Send + Sync + fmt::Debug {
    /// Whether `event` passes this filter.
    fn matches(&self, event: &Event) -> bool;
}

fn same(a: &Arc<dyn Match>, b: &Arc<dyn Match>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// How a [`Collection`] combines its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Logic {
    /// Every member must match; an empty collection matches everything.
    All,
    /// One member must match; an empty collection matches nothing.
    Any,
}

/// An ordered set of filters.
///
/// Members are compared by identity: adding the same `Arc` twice is a
/// no-op, while two equal but distinct filters are both kept. Members can
/// be changed after the collection has been handed to a handler.
pub struct Collection {
    logic: Logic,
    filters: RwLock<Vec<Arc<dyn Match>>>,
}

impl Collection {
    pub fn new(logic: Logic) -> Self {
        Self {
            logic,
            filters: RwLock::new(Vec::new()),
        }
    }

    /// Matches when every member matches.
    pub fn all() -> Self {
        Self::new(Logic::All)
    }

    /// Matches when at least one member matches.
    pub fn any() -> Self {
        Self::new(Logic::Any)
    }

    /// Build a collection from an initial list, dropping repeats.
    pub fn with_filters<I>(logic: Logic, filters: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Match>>,
    {
        let collection = Self::new(logic);
        for filter in filters {
            collection.add(filter);
        }
        collection
    }

    pub fn logic(&self) -> Logic {
        self.logic
    }

    /// Append `filter`. Returns `false` if it was already a member or is
    /// this collection itself.
    ///
    /// Nesting a collection inside one of its own members is not detected
    /// and makes [`Match::matches`] recurse forever.
    pub fn add(&self, filter: Arc<dyn Match>) -> bool {
        if Arc::as_ptr(&filter) as *const () == self as *const Self as *const () {
            return false;
        }
        let mut filters = self.filters.write();
        if filters.iter().any(|f| same(f, &filter)) {
            return false;
        }
        filters.push(filter);
        true
    }

    /// Remove `filter`. Returns `false` if it was not a member.
    pub fn remove(&self, filter: &Arc<dyn Match>) -> bool {
        let mut filters = self.filters.write();
        let before = filters.len();
        filters.retain(|f| !same(f, filter));
        filters.len() != before
    }

    pub fn contains(&self, filter: &Arc<dyn Match>) -> bool {
        self.filters.read().iter().any(|f| same(f, filter))
    }

    /// Snapshot of the members, in insertion order.
    pub fn filters(&self) -> Vec<Arc<dyn Match>> {
        self.filters.read().clone()
    }

    pub fn len(&self) -> usize {
        self.filters.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.read().is_empty()
    }

    pub fn clear(&self) {
        self.filters.write().clear();
    }
}

impl Match for Collection {
    fn matches(&self, event: &Event) -> bool {
        let filters = self.filters.read();
        match self.logic {
            Logic::All => filters.iter().all(|f| f.matches(event)),
            Logic::Any => filters.iter().any(|f| f.matches(event)),
        }
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("logic", &self.logic)
            .field("filters", &*self.filters.read())
            .finish()
    }
}

/// Inverts another filter.
#[derive(Debug, Clone)]
pub struct MatchNot(Arc<dyn Match>);

impl MatchNot {
    pub fn new(filter: Arc<dyn Match>) -> Self {
        Self(filter)
    }

    pub fn inner(&self) -> &Arc<dyn Match> {
        &self.0
    }
}

impl Match for MatchNot {
    fn matches(&self, event: &Event) -> bool {
        !self.0.matches(event)
    }
}
