//! Ordered dispatch of events to registered handlers.

use std::fmt;

use tracing::{debug, trace, warn};

use super::{EventHandler, NumericHandler};
use crate::error::DispatchError;
use crate::event::{Event, EventKind};

/// Identifier returned when a handler is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of dispatching one event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Number of handlers whose callback ran.
    pub fired: usize,
    /// Whether a handler prevented the default action.
    pub default_prevented: bool,
}

/// Handlers of one connection, in registration order.
///
/// Numeric events go to numeric handlers only; every other event goes to
/// event handlers.
#[derive(Debug, Default)]
pub struct Dispatcher {
    next_id: u64,
    events: Vec<(HandlerId, EventHandler)>,
    numerics: Vec<(HandlerId, NumericHandler)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> HandlerId {
        self.next_id += 1;
        HandlerId(self.next_id)
    }

    pub fn add_event_handler(&mut self, handler: EventHandler) -> HandlerId {
        let id = self.next_id();
        debug!(handler = %id, "event handler registered");
        self.events.push((id, handler));
        id
    }

    pub fn add_numeric_handler(&mut self, handler: NumericHandler) -> HandlerId {
        let id = self.next_id();
        debug!(handler = %id, numeric = %handler.numeric(), "numeric handler registered");
        self.numerics.push((id, handler));
        id
    }

    /// Remove a handler of either kind. Returns whether it was registered.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        let before = self.len();
        self.events.retain(|(h, _)| *h != id);
        self.numerics.retain(|(h, _)| *h != id);
        let removed = self.len() != before;
        if removed {
            debug!(handler = %id, "handler removed");
        }
        removed
    }

    /// Total number of registered handlers.
    pub fn len(&self) -> usize {
        self.events.len() + self.numerics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand `event` to every interested handler.
    ///
    /// A numeric handler that fails to resolve its numeric aborts the
    /// dispatch; handlers after it do not run.
    pub fn dispatch(&mut self, event: &Event) -> Result<Dispatch, DispatchError> {
        let mut fired = 0;

        if event.kind() == EventKind::Numeric {
            for (id, handler) in &mut self.numerics {
                match handler.handle(event) {
                    Ok(true) => fired += 1,
                    Ok(false) => {}
                    Err(source) => {
                        warn!(handler = %id, error = %source, "numeric handler failed");
                        return Err(DispatchError::Numeric {
                            handler: id.get(),
                            source,
                        });
                    }
                }
            }
        } else {
            for (_, handler) in &mut self.events {
                if handler.handle(event) {
                    fired += 1;
                }
            }
        }

        let outcome = Dispatch {
            fired,
            default_prevented: event.is_default_prevented(),
        };
        trace!(kind = %event.kind(), fired, default_prevented = outcome.default_prevented, "event dispatched");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::connection::{BasicConnection, Connection};
    use crate::error::NumericError;
    use crate::numeric::{NumericProfile, RawProfile};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn conn() -> Arc<dyn Connection> {
        Arc::new(BasicConnection::new(Config::default()).unwrap())
    }

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> impl FnMut(&Event) + Send {
        let log = Arc::clone(log);
        move |_: &Event| log.lock().push(tag)
    }

    #[test]
    fn test_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        dispatcher.add_event_handler(EventHandler::new(recorder(&log, "first")));
        dispatcher.add_event_handler(EventHandler::new(recorder(&log, "second")));
        dispatcher.add_event_handler(EventHandler::new(recorder(&log, "third")));

        let event = Event::new(conn(), EventKind::Connect).unwrap();
        assert_eq!(dispatcher.dispatch(&event).unwrap().fired, 3);
        assert_eq!(*log.lock(), ["first", "second", "third"]);
    }

    #[test]
    fn test_numeric_skips_event_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        dispatcher.add_event_handler(EventHandler::new(recorder(&log, "event")));
        dispatcher.add_numeric_handler(NumericHandler::new(1u16, recorder(&log, "first")));
        dispatcher.add_numeric_handler(NumericHandler::new(1u16, recorder(&log, "second")));

        let event = Event::numeric(conn(), 1, "srv", "me", "hi").unwrap();
        assert_eq!(dispatcher.dispatch(&event).unwrap().fired, 2);
        assert_eq!(*log.lock(), ["first", "second"]);
    }

    #[test]
    fn test_non_numeric_skips_numeric_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        dispatcher.add_numeric_handler(NumericHandler::new(1u16, recorder(&log, "numeric")));
        dispatcher.add_event_handler(EventHandler::new(recorder(&log, "event")));

        let event = Event::new(conn(), EventKind::Connect).unwrap();
        assert_eq!(dispatcher.dispatch(&event).unwrap().fired, 1);
        assert_eq!(*log.lock(), ["event"]);
    }

    #[test]
    fn test_remove_handler() {
        let mut dispatcher = Dispatcher::new();
        let a = dispatcher.add_event_handler(EventHandler::new(|_| {}));
        let b = dispatcher.add_numeric_handler(NumericHandler::new(5u16, |_| {}));
        assert_ne!(a, b);
        assert_eq!(dispatcher.len(), 2);
        assert!(dispatcher.remove_handler(b));
        assert!(!dispatcher.remove_handler(b));
        assert!(dispatcher.remove_handler(a));
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_default_prevented_reported() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.add_event_handler(EventHandler::new(|event: &Event| {
            event.prevent_default(true);
        }));
        let event = Event::new(conn(), EventKind::Logon).unwrap();
        assert!(dispatcher.dispatch(&event).unwrap().default_prevented);
    }

    #[test]
    fn test_cycle_aborts_dispatch() {
        let mut builder = RawProfile::builder("Loop");
        builder.aliases(&[("RPL_A", "RPL_B"), ("RPL_B", "RPL_A")]).unwrap();
        let looped = builder.build();
        let numerics = NumericProfile::with_profiles([Arc::new(looped)]).unwrap();
        let conn: Arc<dyn Connection> =
            Arc::new(BasicConnection::with_numerics(Config::default(), numerics));

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        let bad = dispatcher.add_numeric_handler(NumericHandler::new(
            conn.num_ref("RPL_A").unwrap(),
            recorder(&log, "bad"),
        ));
        dispatcher.add_numeric_handler(NumericHandler::new(1u16, recorder(&log, "after")));

        let event = Event::numeric(Arc::clone(&conn), 1, "srv", "me", "").unwrap();
        let err = dispatcher.dispatch(&event).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Numeric { handler, source: NumericError::CycleDetected { .. } }
                if handler == bad.get()
        ));
        assert!(log.lock().is_empty());
    }
}
