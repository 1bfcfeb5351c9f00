//! Builtin raw profiles.
//!
//! Each dialect is a pair of static tables (codes, then profile-local
//! aliases) turned into a shared [`RawProfile`] on first use. Dialects that
//! extend an RFC inherit its table and may override individual entries.

use std::sync::{Arc, OnceLock};

use tracing::warn;

use super::{RawProfile, RawTarget};

type Codes = &'static [(&'static str, u16)];
type Aliases = &'static [(&'static str, &'static str)];

// === RFC 1459 ===

const RFC1459_CODES: Codes = &[
    // Command responses
    ("RPL_TRACELINK", 200),
    ("RPL_TRACECONNECTING", 201),
    ("RPL_TRACEHANDSHAKE", 202),
    ("RPL_TRACEUNKNOWN", 203),
    ("RPL_TRACEOPERATOR", 204),
    ("RPL_TRACEUSER", 205),
    ("RPL_TRACESERVER", 206),
    ("RPL_TRACENEWTYPE", 208),
    ("RPL_STATSLINKINFO", 211),
    ("RPL_STATSCOMMANDS", 212),
    ("RPL_STATSCLINE", 213),
    ("RPL_STATSNLINE", 214),
    ("RPL_STATSILINE", 215),
    ("RPL_STATSKLINE", 216),
    ("RPL_STATSYLINE", 218),
    ("RPL_ENDOFSTATS", 219),
    ("RPL_UMODEIS", 221),
    ("RPL_STATSLLINE", 241),
    ("RPL_STATSUPTIME", 242),
    ("RPL_STATSOLINE", 243),
    ("RPL_STATSHLINE", 244),
    ("RPL_LUSERCLIENT", 251),
    ("RPL_LUSEROP", 252),
    ("RPL_LUSERUNKNOWN", 253),
    ("RPL_LUSERCHANNELS", 254),
    ("RPL_LUSERME", 255),
    ("RPL_ADMINME", 256),
    ("RPL_ADMINLOC1", 257),
    ("RPL_ADMINLOC2", 258),
    ("RPL_ADMINEMAIL", 259),
    ("RPL_TRACELOG", 261),
    ("RPL_NONE", 300),
    ("RPL_AWAY", 301),
    ("RPL_USERHOST", 302),
    ("RPL_ISON", 303),
    ("RPL_UNAWAY", 305),
    ("RPL_NOWAWAY", 306),
    ("RPL_WHOISUSER", 311),
    ("RPL_WHOISSERVER", 312),
    ("RPL_WHOISOPERATOR", 313),
    ("RPL_WHOWASUSER", 314),
    ("RPL_ENDOFWHO", 315),
    ("RPL_WHOISIDLE", 317),
    ("RPL_ENDOFWHOIS", 318),
    ("RPL_WHOISCHANNELS", 319),
    ("RPL_LISTSTART", 321),
    ("RPL_LIST", 322),
    ("RPL_LISTEND", 323),
    ("RPL_CHANNELMODEIS", 324),
    ("RPL_NOTOPIC", 331),
    ("RPL_TOPIC", 332),
    ("RPL_INVITING", 341),
    ("RPL_SUMMONING", 342),
    ("RPL_VERSION", 351),
    ("RPL_WHOREPLY", 352),
    ("RPL_NAMREPLY", 353),
    ("RPL_LINKS", 364),
    ("RPL_ENDOFLINKS", 365),
    ("RPL_ENDOFNAMES", 366),
    ("RPL_BANLIST", 367),
    ("RPL_ENDOFBANLIST", 368),
    ("RPL_ENDOFWHOWAS", 369),
    ("RPL_INFO", 371),
    ("RPL_MOTD", 372),
    ("RPL_ENDOFINFO", 374),
    ("RPL_MOTDSTART", 375),
    ("RPL_ENDOFMOTD", 376),
    ("RPL_YOUREOPER", 381),
    ("RPL_REHASHING", 382),
    ("RPL_TIME", 391),
    ("RPL_USERSSTART", 392),
    ("RPL_USERS", 393),
    ("RPL_ENDOFUSERS", 394),
    ("RPL_NOUSERS", 395),
    // Error replies
    ("ERR_NOSUCHNICK", 401),
    ("ERR_NOSUCHSERVER", 402),
    ("ERR_NOSUCHCHANNEL", 403),
    ("ERR_CANNOTSENDTOCHAN", 404),
    ("ERR_TOOMANYCHANNELS", 405),
    ("ERR_WASNOSUCHNICK", 406),
    ("ERR_TOOMANYTARGETS", 407),
    ("ERR_NOORIGIN", 409),
    ("ERR_NORECIPIENT", 411),
    ("ERR_NOTEXTTOSEND", 412),
    ("ERR_NOTOPLEVEL", 413),
    ("ERR_WILDTOPLEVEL", 414),
    ("ERR_UNKNOWNCOMMAND", 421),
    ("ERR_NOMOTD", 422),
    ("ERR_NOADMININFO", 423),
    ("ERR_FILEERROR", 424),
    ("ERR_NONICKNAMEGIVEN", 431),
    ("ERR_ERRONEUSNICKNAME", 432),
    ("ERR_NICKNAMEINUSE", 433),
    ("ERR_NICKCOLLISION", 436),
    ("ERR_USERNOTINCHANNEL", 441),
    ("ERR_NOTONCHANNEL", 442),
    ("ERR_USERONCHANNEL", 443),
    ("ERR_NOLOGIN", 444),
    ("ERR_SUMMONDISABLED", 445),
    ("ERR_USERSDISABLED", 446),
    ("ERR_NOTREGISTERED", 451),
    ("ERR_NEEDMOREPARAMS", 461),
    ("ERR_ALREADYREGISTRED", 462),
    ("ERR_NOPERMFORHOST", 463),
    ("ERR_PASSWDMISMATCH", 464),
    ("ERR_YOUREBANNEDCREEP", 465),
    ("ERR_KEYSET", 467),
    ("ERR_CHANNELISFULL", 471),
    ("ERR_UNKNOWNMODE", 472),
    ("ERR_INVITEONLYCHAN", 473),
    ("ERR_BANNEDFROMCHAN", 474),
    ("ERR_BADCHANNELKEY", 475),
    ("ERR_NOPRIVILEGES", 481),
    ("ERR_CHANOPRIVSNEEDED", 482),
    ("ERR_CANTKILLSERVER", 483),
    ("ERR_NOOPERHOST", 491),
    ("ERR_UMODEUNKNOWNFLAG", 501),
    ("ERR_USERSDONTMATCH", 502),
];

// === RFC 2812 ===

const RFC2812_CODES: Codes = &[
    ("RPL_WELCOME", 1),
    ("RPL_YOURHOST", 2),
    ("RPL_CREATED", 3),
    ("RPL_MYINFO", 4),
    ("RPL_BOUNCE", 5),
    ("RPL_TRACESERVICE", 207),
    ("RPL_TRACECLASS", 209),
    ("RPL_TRACERECONNECT", 210),
    ("RPL_SERVLIST", 234),
    ("RPL_SERVLISTEND", 235),
    ("RPL_STATSVLINE", 240),
    ("RPL_TRACEEND", 262),
    ("RPL_TRYAGAIN", 263),
    ("RPL_UNIQOPIS", 325),
    ("RPL_INVITELIST", 346),
    ("RPL_ENDOFINVITELIST", 347),
    ("RPL_EXCEPTLIST", 348),
    ("RPL_ENDOFEXCEPTLIST", 349),
    ("RPL_YOURESERVICE", 383),
    ("ERR_NOSUCHSERVICE", 408),
    ("ERR_BADMASK", 415),
    ("ERR_UNAVAILRESOURCE", 437),
    ("ERR_YOUWILLBEBANNED", 466),
    ("ERR_BADCHANMASK", 476),
    ("ERR_NOCHANMODES", 477),
    ("ERR_BANLISTFULL", 478),
    ("ERR_RESTRICTED", 484),
    ("ERR_UNIQOPPRIVSNEEDED", 485),
];

// === Bahamut ===

const BAHAMUT_CODES: Codes = &[
    ("RPL_PROTOCTL", 5),
    ("RPL_LOCALUSERS", 265),
    ("RPL_GLOBALUSERS", 266),
    ("RPL_WHOISREGNICK", 307),
    ("RPL_WHOISADMIN", 308),
    ("RPL_WHOISSADMIN", 309),
    ("RPL_WHOISSVCMSG", 310),
    ("RPL_LISTSYNTAX", 334),
    ("RPL_WHOISACTUALLY", 338),
    ("RPL_RWHOREPLY", 354),
    ("ERR_CHANBANREASON", 485),
    ("ERR_NONONREG", 486),
    ("ERR_MSGSERVICES", 487),
    ("ERR_NOSHAREDCHAN", 493),
];

const BAHAMUT_ALIASES: Aliases = &[
    ("RPL_WHOISREGISTERED", "RPL_WHOISREGNICK"),
    ("ERR_NONONREGCHAN", "ERR_NONONREG"),
];

// === InspIRCd ===

const INSPIRCD_CODES: Codes = &[
    ("RPL_ISUPPORT", 5),
    ("RPL_MAPUSERS", 270),
    ("RPL_SYNTAX", 304),
    ("RPL_YOURDISPLAYEDHOST", 396),
    ("ERR_INVALIDCAPCMD", 410),
    ("ERR_ALLMUSTSSL", 490),
    ("ERR_DELAYREJOIN", 495),
    ("ERR_UNKNOWNSNOMASK", 501),
    ("ERR_CANTSENDTOUSER", 531),
    ("RPL_MODLIST", 702),
    ("RPL_ENDOFMODLIST", 703),
    ("ERR_WORDFILTERED", 936),
    ("ERR_CANTUNLOADMODULE", 972),
    ("RPL_UNLOADEDMODULE", 973),
    ("ERR_CANTLOADMODULE", 974),
    ("RPL_LOADEDMODULE", 975),
];

const INSPIRCD_ALIASES: Aliases = &[
    ("ERR_CANNOTSENDTOUSER", "ERR_CANTSENDTOUSER"),
    ("ERR_INVALIDCAPSUBCOMMAND", "ERR_INVALIDCAPCMD"),
    ("RPL_COMMANDSYNTAX", "RPL_SYNTAX"),
];

// === Extensions ===

const SILENCE_CODES: Codes = &[
    ("RPL_SILELIST", 271),
    ("RPL_ENDOFSILELIST", 272),
    ("ERR_SILELISTFULL", 511),
];

const WATCH_CODES: Codes = &[
    ("ERR_TOOMANYWATCH", 512),
    ("RPL_LOGON", 600),
    ("RPL_LOGOFF", 601),
    ("RPL_WATCHOFF", 602),
    ("RPL_WATCHSTAT", 603),
    ("RPL_NOWON", 604),
    ("RPL_NOWOFF", 605),
    ("RPL_WATCHLIST", 606),
    ("RPL_ENDOFWATCHLIST", 607),
];

const RULES_CODES: Codes = &[
    ("RPL_RULES", 232),
    ("RPL_RULESTART", 308),
    ("RPL_ENDOFRULES", 309),
    ("ERR_NORULES", 434),
];

const JUPE_CODES: Codes = &[("RPL_JUPELIST", 282), ("RPL_ENDOFJUPELIST", 283)];

const GLIST_CODES: Codes = &[("RPL_GLIST", 280), ("RPL_ENDOFGLIST", 281)];

const DCCINFO_CODES: Codes = &[
    ("ERR_TOOMANYDCC", 514),
    ("RPL_DCCSTATUS", 617),
    ("RPL_DCCLIST", 618),
    ("RPL_ENDOFDCCLIST", 619),
    ("RPL_DCCINFO", 620),
];

const MAP_CODES: Codes = &[("RPL_MAP", 6), ("RPL_MAPEND", 7)];

fn build(
    name: &str,
    parent: Option<&RawProfile>,
    codes: Codes,
    aliases: Aliases,
) -> Arc<RawProfile> {
    let mut builder = RawProfile::builder(name);
    if let Some(parent) = parent {
        builder.inherit(parent);
    }
    let entries = codes
        .iter()
        .map(|&(n, code)| (n, RawTarget::Code(code)))
        .chain(aliases.iter().map(|&(n, target)| (n, RawTarget::Alias(target.to_owned()))));
    for (entry, target) in entries {
        if let Err(e) = builder.entry(entry, target) {
            debug_assert!(false, "builtin profile {name} is inconsistent: {e}");
            warn!(profile = name, entry, error = %e, "skipping invalid builtin entry");
        }
    }
    Arc::new(builder.build())
}

macro_rules! builtin_profile {
    ($(#[$meta:meta])* $fn:ident, $name:literal, $parent:expr, $codes:expr, $aliases:expr) => {
        $(#[$meta])*
        pub fn $fn() -> Arc<RawProfile> {
            static CELL: OnceLock<Arc<RawProfile>> = OnceLock::new();
            CELL.get_or_init(|| {
                let parent: Option<Arc<RawProfile>> = $parent;
                build($name, parent.as_deref(), $codes, $aliases)
            })
            .clone()
        }
    };
}

builtin_profile!(
    /// Numerics of RFC 1459.
    rfc1459, "RFC1459", None, RFC1459_CODES, &[]
);
builtin_profile!(
    /// Numerics of RFC 2812 (extends RFC 1459).
    rfc2812, "RFC2812", Some(rfc1459()), RFC2812_CODES, &[]
);
builtin_profile!(
    /// Bahamut and its derivatives (extends RFC 2812).
    bahamut, "Bahamut", Some(rfc2812()), BAHAMUT_CODES, BAHAMUT_ALIASES
);
builtin_profile!(
    /// InspIRCd (extends RFC 2812).
    inspircd, "InspIRCd", Some(rfc2812()), INSPIRCD_CODES, INSPIRCD_ALIASES
);
builtin_profile!(
    /// The SILENCE extension.
    silence, "SILENCE", None, SILENCE_CODES, &[]
);
builtin_profile!(
    /// The WATCH extension.
    watch, "WATCH", None, WATCH_CODES, &[]
);
builtin_profile!(
    /// The RULES extension.
    rules, "RULES", None, RULES_CODES, &[]
);
builtin_profile!(
    /// The JUPE extension.
    jupe, "JUPE", None, JUPE_CODES, &[]
);
builtin_profile!(
    /// The GLIST extension.
    glist, "GLIST", None, GLIST_CODES, &[]
);
builtin_profile!(
    /// The DCCINFO extension.
    dccinfo, "DCCINFO", None, DCCINFO_CODES, &[]
);
builtin_profile!(
    /// The MAP extension.
    map, "MAP", None, MAP_CODES, &[]
);

const BUILTIN: &[(&str, fn() -> Arc<RawProfile>)] = &[
    ("RFC1459", rfc1459),
    ("RFC2812", rfc2812),
    ("Bahamut", bahamut),
    ("InspIRCd", inspircd),
    ("SILENCE", silence),
    ("WATCH", watch),
    ("RULES", rules),
    ("JUPE", jupe),
    ("GLIST", glist),
    ("DCCINFO", dccinfo),
    ("MAP", map),
];

/// Look up a builtin profile by name (case-insensitive).
pub fn builtin(name: &str) -> Option<Arc<RawProfile>> {
    BUILTIN
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, f)| f())
}

/// Names of every builtin profile.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(n, _)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_builds() {
        for name in builtin_names() {
            let profile = builtin(name).unwrap();
            assert_eq!(profile.name(), name);
            assert!(!profile.is_empty());
        }
    }

    #[test]
    fn test_tables_are_consistent() {
        let tables: &[(&str, Codes, Aliases)] = &[
            ("RFC1459", RFC1459_CODES, &[]),
            ("RFC2812", RFC2812_CODES, &[]),
            ("Bahamut", BAHAMUT_CODES, BAHAMUT_ALIASES),
            ("InspIRCd", INSPIRCD_CODES, INSPIRCD_ALIASES),
            ("SILENCE", SILENCE_CODES, &[]),
            ("WATCH", WATCH_CODES, &[]),
            ("RULES", RULES_CODES, &[]),
            ("JUPE", JUPE_CODES, &[]),
            ("GLIST", GLIST_CODES, &[]),
            ("DCCINFO", DCCINFO_CODES, &[]),
            ("MAP", MAP_CODES, &[]),
        ];
        for (name, codes, aliases) in tables {
            let mut builder = RawProfile::builder(*name);
            assert!(builder.codes(codes).is_ok(), "{name}");
            assert!(builder.aliases(aliases).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        assert_eq!(builtin("inspircd").unwrap().name(), "InspIRCd");
        assert!(builtin("unknown").is_none());
    }

    #[test]
    fn test_builtins_are_shared() {
        assert!(Arc::ptr_eq(&rfc2812(), &rfc2812()));
    }

    #[test]
    fn test_rfc2812_inherits_rfc1459() {
        let p = rfc2812();
        assert_eq!(p.get("RPL_WELCOME"), Some(&RawTarget::Code(1)));
        assert_eq!(p.get("ERR_ALREADYREGISTRED"), Some(&RawTarget::Code(462)));
        assert_eq!(p.get("ERR_NICKNAMEINUSE"), Some(&RawTarget::Code(433)));
        assert_eq!(p.get("RPL_NAMREPLY"), Some(&RawTarget::Code(353)));
        assert!(rfc1459().get("RPL_WELCOME").is_none());
    }

    #[test]
    fn test_dialect_overrides() {
        assert_eq!(bahamut().get("ERR_CHANBANREASON"), Some(&RawTarget::Code(485)));
        assert_eq!(
            bahamut().get("ERR_UNIQOPPRIVSNEEDED"),
            Some(&RawTarget::Code(485))
        );
        assert_eq!(inspircd().get("ERR_UNKNOWNSNOMASK"), Some(&RawTarget::Code(501)));
    }

    #[test]
    fn test_extension_codes() {
        assert_eq!(inspircd().get("RPL_SYNTAX"), Some(&RawTarget::Code(304)));
        assert_eq!(bahamut().get("RPL_RWHOREPLY"), Some(&RawTarget::Code(354)));
        assert_eq!(silence().get("ERR_SILELISTFULL"), Some(&RawTarget::Code(511)));
        assert_eq!(watch().get("RPL_ENDOFWATCHLIST"), Some(&RawTarget::Code(607)));
        assert_eq!(rules().get("ERR_NORULES"), Some(&RawTarget::Code(434)));
        assert_eq!(jupe().get("RPL_JUPELIST"), Some(&RawTarget::Code(282)));
        assert_eq!(glist().get("RPL_ENDOFGLIST"), Some(&RawTarget::Code(281)));
        assert_eq!(dccinfo().get("RPL_DCCINFO"), Some(&RawTarget::Code(620)));
        assert_eq!(map().get("RPL_MAPEND"), Some(&RawTarget::Code(7)));
    }
}
