//! Event and numeric handlers, and the dispatcher that drives them.

mod dispatch;

pub use self::dispatch::{Dispatch, Dispatcher, HandlerId};

use std::fmt;
use std::sync::Arc;

use crate::error::NumericError;
use crate::event::Event;
use crate::matcher::Match;
use crate::numeric::Numeric;

/// Callback invoked with the event that triggered it.
pub type Callback = Box<dyn FnMut(&Event) + Send>;

/// Runs a callback for events accepted by an optional filter.
pub struct EventHandler {
    callback: Callback,
    filter: Option<Arc<dyn Match>>,
}

impl EventHandler {
    /// A handler that fires for every event.
    pub fn new(callback: impl FnMut(&Event) + Send + 'static) -> Self {
        Self {
            callback: Box::new(callback),
            filter: None,
        }
    }

    /// Restrict this handler to events accepted by `filter`.
    pub fn with_filter(mut self, filter: Arc<dyn Match>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// The filter guarding the callback, if any.
    pub fn filter(&self) -> Option<&Arc<dyn Match>> {
        self.filter.as_ref()
    }

    /// Replace the filter; `None` accepts every event.
    pub fn set_filter(&mut self, filter: Option<Arc<dyn Match>>) -> Option<Arc<dyn Match>> {
        std::mem::replace(&mut self.filter, filter)
    }

    /// Replace the callback.
    pub fn set_callback(&mut self, callback: impl FnMut(&Event) + Send + 'static) {
        self.callback = Box::new(callback);
    }

    /// Invoke the callback if the filter accepts `event`.
    ///
    /// Returns whether the callback ran.
    pub fn handle(&mut self, event: &Event) -> bool {
        if let Some(filter) = &self.filter {
            if !filter.matches(event) {
                return false;
            }
        }
        (self.callback)(event);
        true
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// Runs a callback for numeric events with a given code.
///
/// The numeric is resolved on every call, so a [`Numeric::Reference`]
/// follows profile changes made after the handler was built.
pub struct NumericHandler {
    numeric: Numeric,
    callback: Callback,
}

impl NumericHandler {
    /// Handle events carrying `numeric`, a code or a reference.
    pub fn new(numeric: impl Into<Numeric>, callback: impl FnMut(&Event) + Send + 'static) -> Self {
        Self {
            numeric: numeric.into(),
            callback: Box::new(callback),
        }
    }

    /// The numeric this handler waits for.
    pub fn numeric(&self) -> &Numeric {
        &self.numeric
    }

    /// Replace the numeric, returning the previous one.
    pub fn set_numeric(&mut self, numeric: impl Into<Numeric>) -> Numeric {
        std::mem::replace(&mut self.numeric, numeric.into())
    }

    /// Replace the callback.
    pub fn set_callback(&mut self, callback: impl FnMut(&Event) + Send + 'static) {
        self.callback = Box::new(callback);
    }

    /// Invoke the callback if `event` is a numeric matching this handler.
    ///
    /// A numeric name the profile does not know never matches. Cycles in
    /// the profile are reported as errors.
    pub fn handle(&mut self, event: &Event) -> Result<bool, NumericError> {
        let Some(code) = event.code() else {
            return Ok(false);
        };
        match self.numeric.resolve()? {
            Some(expected) if expected == code => {
                (self.callback)(event);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl fmt::Debug for NumericHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericHandler")
            .field("numeric", &self.numeric)
            .finish_non_exhaustive()
    }
}
