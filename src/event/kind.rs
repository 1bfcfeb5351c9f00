//! Event kinds and the facets they carry.

use std::fmt;
use std::ops::BitOr;

/// Set of attributes an event carries besides its connection.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Facets(u8);

impl Facets {
    /// No facet at all.
    pub const NONE: Self = Self(0);
    /// A channel name.
    pub const CHAN: Self = Self(1);
    /// The identity of the sender.
    pub const SOURCE: Self = Self(1 << 1);
    /// A target (nickname or channel).
    pub const TARGET: Self = Self(1 << 2);
    /// Message text.
    pub const TEXT: Self = Self(1 << 3);
    /// A CTCP type; only used together with [`Facets::TEXT`].
    pub const CTCP: Self = Self(1 << 4);
    /// A numeric reply code.
    pub const NUMERIC: Self = Self(1 << 5);

    const NAMES: [(Self, &'static str); 6] = [
        (Self::CHAN, "chan"),
        (Self::SOURCE, "source"),
        (Self::TARGET, "target"),
        (Self::TEXT, "text"),
        (Self::CTCP, "ctcp"),
        (Self::NUMERIC, "numeric"),
    ];

    /// Union of two facet sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether every facet of `other` is present.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bit representation.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Facets {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for Facets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(facet, _)| self.contains(*facet))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("Facets(none)")
        } else {
            write!(f, "Facets({})", names.join("+"))
        }
    }
}

const TEXT: Facets = Facets::TEXT;
const SOURCE_TEXT: Facets = Facets::SOURCE.union(Facets::TEXT);
const SOURCE_TARGET: Facets = Facets::SOURCE.union(Facets::TARGET);
const SOURCE_TARGET_TEXT: Facets = SOURCE_TARGET.union(Facets::TEXT);
const CHAN_SOURCE: Facets = Facets::CHAN.union(Facets::SOURCE);
const CHAN_SOURCE_TEXT: Facets = CHAN_SOURCE.union(Facets::TEXT);
const CHAN_SOURCE_TARGET: Facets = CHAN_SOURCE.union(Facets::TARGET);
const CHAN_SOURCE_TARGET_TEXT: Facets = CHAN_SOURCE_TARGET.union(Facets::TEXT);
const SOURCE_TEXT_CTCP: Facets = SOURCE_TEXT.union(Facets::CTCP);
const CHAN_SOURCE_TEXT_CTCP: Facets = CHAN_SOURCE_TEXT.union(Facets::CTCP);
const NUMERIC: Facets = SOURCE_TARGET_TEXT.union(Facets::NUMERIC);

/// Concrete kinds of events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EventKind {
    // No facets
    Connect,
    Logon,
    Disconnect,
    Exit,

    // Text
    Ping,
    Error,

    // Source + text
    Pong,
    Quit,
    PrivateText,
    PrivateNotice,

    // Source + target
    Nick,

    // Source + target + text
    Kill,
    UserMode,

    // Chan + source
    Join,

    // Chan + source + text
    Part,
    Topic,
    ChanText,
    ChanNotice,

    // Chan + source + target
    Invite,
    Op,
    Deop,
    Voice,
    Devoice,
    Halfop,
    Dehalfop,
    Ban,
    Unban,
    Except,
    Unexcept,

    // Chan + source + target + text
    Kick,

    // Source + text + CTCP
    PrivateCtcp,
    PrivateCtcpReply,

    // Chan + source + text + CTCP
    ChanCtcp,
    ChanCtcpReply,

    /// A numeric server reply.
    Numeric,
}

impl EventKind {
    /// The facets events of this kind carry.
    pub const fn facets(self) -> Facets {
        use EventKind::*;
        match self {
            Connect | Logon | Disconnect | Exit => Facets::NONE,
            Ping | Error => TEXT,
            Pong | Quit | PrivateText | PrivateNotice => SOURCE_TEXT,
            Nick => SOURCE_TARGET,
            Kill | UserMode => SOURCE_TARGET_TEXT,
            Join => CHAN_SOURCE,
            Part | Topic | ChanText | ChanNotice => CHAN_SOURCE_TEXT,
            Invite | Op | Deop | Voice | Devoice | Halfop | Dehalfop | Ban | Unban | Except
            | Unexcept => CHAN_SOURCE_TARGET,
            Kick => CHAN_SOURCE_TARGET_TEXT,
            PrivateCtcp | PrivateCtcpReply => SOURCE_TEXT_CTCP,
            ChanCtcp | ChanCtcpReply => CHAN_SOURCE_TEXT_CTCP,
            Numeric => NUMERIC,
        }
    }

    /// Name of the kind, as used in logs.
    pub const fn as_str(self) -> &'static str {
        use EventKind::*;
        match self {
            Connect => "Connect",
            Logon => "Logon",
            Disconnect => "Disconnect",
            Exit => "Exit",
            Ping => "Ping",
            Error => "Error",
            Pong => "Pong",
            Quit => "Quit",
            PrivateText => "PrivateText",
            PrivateNotice => "PrivateNotice",
            Nick => "Nick",
            Kill => "Kill",
            UserMode => "UserMode",
            Join => "Join",
            Part => "Part",
            Topic => "Topic",
            ChanText => "ChanText",
            ChanNotice => "ChanNotice",
            Invite => "Invite",
            Op => "Op",
            Deop => "Deop",
            Voice => "Voice",
            Devoice => "Devoice",
            Halfop => "Halfop",
            Dehalfop => "Dehalfop",
            Ban => "Ban",
            Unban => "Unban",
            Except => "Except",
            Unexcept => "Unexcept",
            Kick => "Kick",
            PrivateCtcp => "PrivateCtcp",
            PrivateCtcpReply => "PrivateCtcpReply",
            ChanCtcp => "ChanCtcp",
            ChanCtcpReply => "ChanCtcpReply",
            Numeric => "Numeric",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_set_operations() {
        let f = Facets::CHAN | Facets::SOURCE;
        assert!(f.contains(Facets::CHAN));
        assert!(f.contains(Facets::CHAN | Facets::SOURCE));
        assert!(!f.contains(Facets::TEXT));
        assert!(f.contains(Facets::NONE));
        assert_eq!(f.bits(), 0b11);
    }

    #[test]
    fn test_facet_debug() {
        assert_eq!(format!("{:?}", Facets::NONE), "Facets(none)");
        assert_eq!(
            format!("{:?}", EventKind::Kick.facets()),
            "Facets(chan+source+target+text)"
        );
    }

    #[test]
    fn test_ctcp_kinds_carry_text() {
        for kind in [
            EventKind::PrivateCtcp,
            EventKind::PrivateCtcpReply,
            EventKind::ChanCtcp,
            EventKind::ChanCtcpReply,
        ] {
            assert!(kind.facets().contains(Facets::TEXT | Facets::CTCP));
        }
    }

    #[test]
    fn test_numeric_shape() {
        let f = EventKind::Numeric.facets();
        assert!(f.contains(Facets::SOURCE | Facets::TARGET | Facets::TEXT | Facets::NUMERIC));
        assert!(!f.contains(Facets::CHAN));
    }
}
