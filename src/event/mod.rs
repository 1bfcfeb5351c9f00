//! IRC events.
//!
//! An [`Event`] is a connection plus a fixed set of facets (channel,
//! source, target, text, CTCP type, numeric code). Which facets an event
//! carries is determined by its [`EventKind`]; the constructors refuse any
//! other combination, so handlers can rely on [`Event::has`] to know which
//! accessors return `Some`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use erebot_core::{BasicConnection, Config, Connection, Event, EventKind, Facets};
//!
//! let conn: Arc<dyn Connection> = Arc::new(BasicConnection::new(Config::default()).unwrap());
//! let event = Event::with_chan_source_text(
//!     conn,
//!     EventKind::ChanText,
//!     "#rust",
//!     "alice!al@example.com",
//!     "!help me",
//! )
//! .unwrap();
//!
//! assert!(event.has(Facets::CHAN | Facets::TEXT));
//! assert_eq!(event.source().map(|s| s.nick()), Some("alice"));
//! assert!(!event.prevent_default(true));
//! assert!(event.is_default_prevented());
//! ```

mod kind;

pub use self::kind::{EventKind, Facets};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::connection::Connection;
use crate::error::EventError;
use crate::identity::Identity;
use crate::numeric::is_valid_code;
use crate::text::TextWrapper;

#[derive(Default)]
struct Parts {
    chan: Option<String>,
    source: Option<Identity>,
    target: Option<String>,
    text: Option<TextWrapper>,
    ctcp_type: Option<String>,
    code: Option<u16>,
}

/// An event raised on a connection.
pub struct Event {
    kind: EventKind,
    connection: Arc<dyn Connection>,
    parts: Parts,
    default_prevented: AtomicBool,
}

impl Event {
    fn build(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        shape: Facets,
        parts: Parts,
    ) -> Result<Self, EventError> {
        if kind.facets() != shape {
            return Err(EventError::InvalidValue(format!(
                "{} events carry {:?}, not {:?}",
                kind,
                kind.facets(),
                shape
            )));
        }
        Ok(Self {
            kind,
            connection,
            parts,
            default_prevented: AtomicBool::new(false),
        })
    }

    /// An event without facets (connect, logon, disconnect, exit).
    pub fn new(connection: Arc<dyn Connection>, kind: EventKind) -> Result<Self, EventError> {
        Self::build(connection, kind, Facets::NONE, Parts::default())
    }

    /// An event carrying only text (ping, error).
    pub fn with_text(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        text: impl Into<TextWrapper>,
    ) -> Result<Self, EventError> {
        let parts = Parts {
            text: Some(text.into()),
            ..Parts::default()
        };
        Self::build(connection, kind, Facets::TEXT, parts)
    }

    /// Source and text (pong, quit, private messages).
    pub fn with_source_text(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        source: impl Into<Identity>,
        text: impl Into<TextWrapper>,
    ) -> Result<Self, EventError> {
        let parts = Parts {
            source: Some(source.into()),
            text: Some(text.into()),
            ..Parts::default()
        };
        Self::build(connection, kind, Facets::SOURCE | Facets::TEXT, parts)
    }

    /// Source and target (nick changes).
    pub fn with_source_target(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        source: impl Into<Identity>,
        target: impl Into<String>,
    ) -> Result<Self, EventError> {
        let parts = Parts {
            source: Some(source.into()),
            target: Some(target.into()),
            ..Parts::default()
        };
        Self::build(connection, kind, Facets::SOURCE | Facets::TARGET, parts)
    }

    /// Source, target and text (kill, user modes).
    pub fn with_source_target_text(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        source: impl Into<Identity>,
        target: impl Into<String>,
        text: impl Into<TextWrapper>,
    ) -> Result<Self, EventError> {
        let parts = Parts {
            source: Some(source.into()),
            target: Some(target.into()),
            text: Some(text.into()),
            ..Parts::default()
        };
        Self::build(
            connection,
            kind,
            Facets::SOURCE | Facets::TARGET | Facets::TEXT,
            parts,
        )
    }

    /// Channel and source (join).
    pub fn with_chan_source(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        chan: impl Into<String>,
        source: impl Into<Identity>,
    ) -> Result<Self, EventError> {
        let parts = Parts {
            chan: Some(chan.into()),
            source: Some(source.into()),
            ..Parts::default()
        };
        Self::build(connection, kind, Facets::CHAN | Facets::SOURCE, parts)
    }

    /// Channel, source and text (part, topic, channel messages).
    pub fn with_chan_source_text(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        chan: impl Into<String>,
        source: impl Into<Identity>,
        text: impl Into<TextWrapper>,
    ) -> Result<Self, EventError> {
        let parts = Parts {
            chan: Some(chan.into()),
            source: Some(source.into()),
            text: Some(text.into()),
            ..Parts::default()
        };
        Self::build(
            connection,
            kind,
            Facets::CHAN | Facets::SOURCE | Facets::TEXT,
            parts,
        )
    }

    /// Channel, source and target (invite, channel status changes, bans).
    pub fn with_chan_source_target(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        chan: impl Into<String>,
        source: impl Into<Identity>,
        target: impl Into<String>,
    ) -> Result<Self, EventError> {
        let parts = Parts {
            chan: Some(chan.into()),
            source: Some(source.into()),
            target: Some(target.into()),
            ..Parts::default()
        };
        Self::build(
            connection,
            kind,
            Facets::CHAN | Facets::SOURCE | Facets::TARGET,
            parts,
        )
    }

    /// Channel, source, target and text (kick).
    pub fn with_chan_source_target_text(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        chan: impl Into<String>,
        source: impl Into<Identity>,
        target: impl Into<String>,
        text: impl Into<TextWrapper>,
    ) -> Result<Self, EventError> {
        let parts = Parts {
            chan: Some(chan.into()),
            source: Some(source.into()),
            target: Some(target.into()),
            text: Some(text.into()),
            ..Parts::default()
        };
        Self::build(
            connection,
            kind,
            Facets::CHAN | Facets::SOURCE | Facets::TARGET | Facets::TEXT,
            parts,
        )
    }

    /// A private CTCP request or reply.
    pub fn with_source_text_ctcp(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        source: impl Into<Identity>,
        ctcp_type: impl Into<String>,
        text: impl Into<TextWrapper>,
    ) -> Result<Self, EventError> {
        let parts = Parts {
            source: Some(source.into()),
            ctcp_type: Some(ctcp_type.into()),
            text: Some(text.into()),
            ..Parts::default()
        };
        Self::build(
            connection,
            kind,
            Facets::SOURCE | Facets::TEXT | Facets::CTCP,
            parts,
        )
    }

    /// A CTCP request or reply sent to a channel.
    pub fn with_chan_source_text_ctcp(
        connection: Arc<dyn Connection>,
        kind: EventKind,
        chan: impl Into<String>,
        source: impl Into<Identity>,
        ctcp_type: impl Into<String>,
        text: impl Into<TextWrapper>,
    ) -> Result<Self, EventError> {
        let parts = Parts {
            chan: Some(chan.into()),
            source: Some(source.into()),
            ctcp_type: Some(ctcp_type.into()),
            text: Some(text.into()),
            ..Parts::default()
        };
        Self::build(
            connection,
            kind,
            Facets::CHAN | Facets::SOURCE | Facets::TEXT | Facets::CTCP,
            parts,
        )
    }

    /// A numeric reply from `source` to `target`.
    pub fn numeric(
        connection: Arc<dyn Connection>,
        code: u16,
        source: impl Into<Identity>,
        target: impl Into<String>,
        text: impl Into<TextWrapper>,
    ) -> Result<Self, EventError> {
        if !is_valid_code(u32::from(code)) {
            return Err(EventError::InvalidValue(format!(
                "numeric code {} is out of range",
                code
            )));
        }
        let parts = Parts {
            source: Some(source.into()),
            target: Some(target.into()),
            text: Some(text.into()),
            code: Some(code),
            ..Parts::default()
        };
        Self::build(
            connection,
            EventKind::Numeric,
            EventKind::Numeric.facets(),
            parts,
        )
    }

    /// The kind of this event.
    #[inline]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The facets this event carries.
    #[inline]
    pub fn facets(&self) -> Facets {
        self.kind.facets()
    }

    /// Whether this event carries every facet in `facets`.
    #[inline]
    pub fn has(&self, facets: Facets) -> bool {
        self.facets().contains(facets)
    }

    /// The connection the event was raised on.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Channel the event happened on.
    pub fn chan(&self) -> Option<&str> {
        self.parts.chan.as_deref()
    }

    /// Who caused the event, parsed once at construction.
    pub fn source(&self) -> Option<&Identity> {
        self.parts.source.as_ref()
    }

    /// Nick or server the event is aimed at.
    pub fn target(&self) -> Option<&str> {
        self.parts.target.as_deref()
    }

    /// Message text.
    pub fn text(&self) -> Option<&TextWrapper> {
        self.parts.text.as_ref()
    }

    /// CTCP command, such as `VERSION` or `ACTION`.
    pub fn ctcp_type(&self) -> Option<&str> {
        self.parts.ctcp_type.as_deref()
    }

    /// Numeric code, for [`EventKind::Numeric`] events.
    pub fn code(&self) -> Option<u16> {
        self.parts.code
    }

    /// Set the "default prevented" flag and return its previous value.
    pub fn prevent_default(&self, prevent: bool) -> bool {
        self.default_prevented.swap(prevent, Ordering::AcqRel)
    }

    /// Whether a handler asked for the default action to be skipped.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("chan", &self.parts.chan)
            .field("source", &self.parts.source)
            .field("target", &self.parts.target)
            .field("text", &self.parts.text.as_ref().map(TextWrapper::as_str))
            .field("ctcp_type", &self.parts.ctcp_type)
            .field("code", &self.parts.code)
            .field("default_prevented", &self.is_default_prevented())
            .finish_non_exhaustive()
    }
}
