//! IRC numeric replies resolved by symbolic name.
//!
//! IRC daemons disagree on what most three-digit replies are called and,
//! sometimes, on which code a given reply uses. This module lets a
//! connection describe the dialect it talks to as an ordered stack of
//! [`RawProfile`]s and resolve names such as `RPL_WELCOME` against it.
//!
//! # Example
//!
//! ```
//! use erebot_core::numeric::{raw, NumericProfile};
//!
//! let mut numerics = NumericProfile::new();
//! numerics.register(raw::rfc2812()).unwrap();
//! numerics.register(raw::inspircd()).unwrap();
//!
//! assert_eq!(numerics.resolve("RPL_WELCOME").unwrap(), Some(1));
//! assert_eq!(numerics.resolve("rpl_syntax").unwrap(), Some(304));
//! assert_eq!(numerics.resolve("RPL_NOSUCHTHING").unwrap(), None);
//! ```

pub mod aliases;
mod parse;
pub mod raw;
mod reference;
mod registry;

pub use self::raw::{RawProfile, RawProfileBuilder, RawTarget};
pub use self::reference::{Numeric, NumericReference};
pub use self::registry::{NumericProfile, SharedNumerics};

use crate::error::NumericError;

/// Highest numeric an IRC server may send.
pub const MAX_NUMERIC: u16 = 999;

/// Whether `code` is a usable terminal value.
#[inline]
pub fn is_valid_code(code: u32) -> bool {
    (1..=u32::from(MAX_NUMERIC)).contains(&code)
}

/// Canonical (uppercase) form of a symbolic numeric name.
///
/// Names are made of ASCII letters, digits and underscores; anything
/// else is rejected so that typos fail loudly instead of resolving to
/// nothing.
pub fn canonical_name(name: &str) -> Result<String, NumericError> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(NumericError::InvalidName(name.to_owned()));
    }
    Ok(name.to_ascii_uppercase())
}
