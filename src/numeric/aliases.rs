//! Cross-IRCd alias table.
//!
//! Different daemons (and RFCs, and their errata) spell the same reply in
//! different ways. Every pair below names one reply twice; resolution treats
//! the two spellings as interchangeable, whichever one a profile happens to
//! define.

/// Pairs of equivalent numeric names.
pub const EQUIVALENTS: &[(&str, &str)] = &[
    ("ERR_ALREADYREGISTERED", "ERR_ALREADYREGISTRED"),
    ("RPL_YOURHOSTIS", "RPL_YOURHOST"),
    ("RPL_BOUNCE", "RPL_REDIR"),
    ("RPL_NAMEREPLY", "RPL_NAMREPLY"),
    ("ERR_ERRONEOUSNICKNAME", "ERR_ERRONEUSNICKNAME"),
    ("ERR_UNIQOPRIVSNEEDED", "ERR_UNIQOPPRIVSNEEDED"),
    ("ERR_NOCTCP", "ERR_NOCTCPALLOWED"),
    ("RPL_ISUPPORT", "RPL_PROTOCTL"),
    ("RPL_LOCALUSERS", "RPL_CURRENT_LOCAL"),
    ("RPL_GLOBALUSERS", "RPL_CURRENT_GLOBAL"),
    ("ERR_NICKTOOFAST", "ERR_NCHANGETOOFAST"),
    ("RPL_RULESTART", "RPL_RULESSTART"),
    ("RPL_ENDOFMAP", "RPL_MAPEND"),
    ("RPL_WHOISSECURE", "RPL_WHOISSSL"),
    ("RPL_YOURDISPLAYEDHOST", "RPL_HOSTHIDDEN"),
    ("RPL_WHOSPCRPL", "RPL_RWHOREPLY"),
    ("RPL_ENDOFSILELIST", "RPL_ENDOFSILENCELIST"),
    ("RPL_SILELIST", "RPL_SILENCELIST"),
];

/// Every spelling equivalent to a canonical `name`, excluding `name` itself.
pub fn equivalents(name: &str) -> impl Iterator<Item = &'static str> + '_ {
    EQUIVALENTS.iter().filter_map(move |&(a, b)| {
        if a == name {
            Some(b)
        } else if b == name {
            Some(a)
        } else {
            None
        }
    })
}
