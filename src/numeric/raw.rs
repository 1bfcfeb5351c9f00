//! Raw profiles: immutable name tables for one IRC dialect.
//!
//! A raw profile maps symbolic names either to a code in `1..=999` or to
//! another symbolic name. Profiles are built once, validated while being
//! built, and then shared read-only (`Arc<RawProfile>`) between every
//! connection that uses them.

mod tables;

use std::collections::HashMap;
use std::fmt;

use super::{canonical_name, is_valid_code};
use crate::error::NumericError;

pub use self::tables::{
    bahamut, builtin, builtin_names, dccinfo, glist, inspircd, jupe, map, rfc1459, rfc2812,
    rules, silence, watch,
};

/// What a symbolic name stands for inside a raw profile.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RawTarget {
    /// A concrete numeric.
    Code(u16),
    /// Another symbolic name, resolved transitively.
    Alias(String),
}

impl RawTarget {
    /// The code, if this is a direct mapping.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Alias(_) => None,
        }
    }

    /// The aliased name, if this is an alias.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::Code(_) => None,
            Self::Alias(name) => Some(name),
        }
    }
}

impl fmt::Display for RawTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{:03}", code),
            Self::Alias(name) => f.write_str(name),
        }
    }
}

/// An immutable, named table of numeric definitions.
#[derive(Clone, Debug)]
pub struct RawProfile {
    name: String,
    entries: Vec<(String, RawTarget)>,
    index: HashMap<String, usize>,
}

impl RawProfile {
    /// Start building a profile called `name`.
    pub fn builder(name: impl Into<String>) -> RawProfileBuilder {
        RawProfileBuilder::new(name)
    }

    /// Stable identifier of the profile (e.g. `RFC2812`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Definitions in declaration order.
    ///
    /// Inherited entries come first; entries overridden by the profile keep
    /// their inherited position. Each call starts a fresh iteration.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = (&str, &RawTarget)> + '_ {
        self.entries.iter().map(|(name, target)| (name.as_str(), target))
    }

    /// Look up a canonical (uppercase) name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&RawTarget> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Whether the profile has an entry for a canonical name.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the profile defines nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for RawProfile {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.entries == other.entries
    }
}

impl Eq for RawProfile {}

/// Incremental, validating constructor for [`RawProfile`].
///
/// # Example
///
/// ```
/// use erebot_core::numeric::{RawProfile, RawTarget};
///
/// let mut builder = RawProfile::builder("custom");
/// builder.code("RPL_WELCOME", 1).unwrap();
/// builder.alias("RPL_HELLO", "rpl_welcome").unwrap();
/// assert!(builder.code("RPL_WELCOME", 2).is_err());
///
/// let profile = builder.build();
/// assert_eq!(profile.get("RPL_HELLO"), Some(&RawTarget::Alias("RPL_WELCOME".into())));
/// ```
#[derive(Debug)]
pub struct RawProfileBuilder {
    name: String,
    entries: Vec<(String, RawTarget)>,
    index: HashMap<String, usize>,
    own: Vec<bool>,
}

impl RawProfileBuilder {
    /// Create an empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            index: HashMap::new(),
            own: Vec::new(),
        }
    }

    /// Copy every entry of `parent` as an overridable base.
    ///
    /// Entries already defined by this builder are kept; entries inherited
    /// from an earlier parent are replaced.
    pub fn inherit(&mut self, parent: &RawProfile) -> &mut Self {
        for (name, target) in parent.entries() {
            match self.index.get(name) {
                Some(&i) if self.own[i] => {}
                Some(&i) => self.entries[i].1 = target.clone(),
                None => self.push(name.to_owned(), target.clone(), false),
            }
        }
        self
    }

    /// Define `name` with an explicit target.
    pub fn entry(&mut self, name: &str, target: RawTarget) -> Result<&mut Self, NumericError> {
        let name = canonical_name(name)?;
        let target = match target {
            RawTarget::Code(code) if !is_valid_code(u32::from(code)) => {
                return Err(NumericError::OutOfRange {
                    name,
                    code: u32::from(code),
                });
            }
            RawTarget::Code(code) => RawTarget::Code(code),
            RawTarget::Alias(other) => RawTarget::Alias(canonical_name(&other)?),
        };

        match self.index.get(&name) {
            Some(&i) if self.own[i] => {
                let existing = &self.entries[i].1;
                if *existing != target {
                    return Err(NumericError::DefinitionConflict {
                        profile: self.name.clone(),
                        name,
                        existing: existing.to_string(),
                        new: target.to_string(),
                    });
                }
            }
            Some(&i) => {
                self.entries[i].1 = target;
                self.own[i] = true;
            }
            None => self.push(name, target, true),
        }
        Ok(self)
    }

    /// Define `name` as a direct mapping to `code`.
    pub fn code(&mut self, name: &str, code: u16) -> Result<&mut Self, NumericError> {
        self.entry(name, RawTarget::Code(code))
    }

    /// Define `name` as an alias of `target`.
    pub fn alias(&mut self, name: &str, target: &str) -> Result<&mut Self, NumericError> {
        self.entry(name, RawTarget::Alias(target.to_owned()))
    }

    /// Define every `(name, code)` pair of a table.
    pub fn codes(&mut self, table: &[(&str, u16)]) -> Result<&mut Self, NumericError> {
        for &(name, code) in table {
            self.code(name, code)?;
        }
        Ok(self)
    }

    /// Define every `(name, target)` alias pair of a table.
    pub fn aliases(&mut self, table: &[(&str, &str)]) -> Result<&mut Self, NumericError> {
        for &(name, target) in table {
            self.alias(name, target)?;
        }
        Ok(self)
    }

    /// Freeze the definitions into a profile.
    pub fn build(self) -> RawProfile {
        RawProfile {
            name: self.name,
            entries: self.entries,
            index: self.index,
        }
    }

    fn push(&mut self, name: String, target: RawTarget, own: bool) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, target));
        self.own.push(own);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent() -> RawProfile {
        let mut b = RawProfile::builder("parent");
        b.code("RPL_WELCOME", 1)
            .unwrap()
            .code("RPL_BOUNCE", 5)
            .unwrap();
        b.build()
    }

    #[test]
    fn test_names_are_canonicalized() {
        let mut b = RawProfile::builder("p");
        b.code("rpl_welcome", 1).unwrap();
        b.alias("Rpl_Hello", "rpl_welcome").unwrap();
        let p = b.build();

        assert_eq!(p.get("RPL_WELCOME"), Some(&RawTarget::Code(1)));
        assert_eq!(p.get("RPL_HELLO"), Some(&RawTarget::Alias("RPL_WELCOME".to_string())));
        assert_eq!(p.get("rpl_welcome"), None);
    }

    #[test]
    fn test_duplicate_identical_definition_is_accepted() {
        let mut b = RawProfile::builder("p");
        b.code("RPL_WELCOME", 1).unwrap();
        b.code("RPL_WELCOME", 1).unwrap();
        assert_eq!(b.build().len(), 1);
    }

    #[test]
    fn test_conflicting_definition_is_rejected() {
        let mut b = RawProfile::builder("p");
        b.code("RPL_WELCOME", 1).unwrap();
        let err = b.alias("RPL_WELCOME", "RPL_HELLO").unwrap_err();
        assert_eq!(
            err,
            NumericError::DefinitionConflict {
                profile: "p".to_string(),
                name: "RPL_WELCOME".to_string(),
                existing: "001".to_string(),
                new: "RPL_HELLO".to_string(),
            }
        );
    }

    #[test]
    fn test_out_of_range_codes() {
        let mut b = RawProfile::builder("p");
        assert!(matches!(
            b.code("RPL_ZERO", 0),
            Err(NumericError::OutOfRange { code: 0, .. })
        ));
        assert!(matches!(
            b.code("RPL_HUGE", 1000),
            Err(NumericError::OutOfRange { code: 1000, .. })
        ));
        assert!(b.code("RPL_MAX", 999).is_ok());
    }

    #[test]
    fn test_invalid_names() {
        let mut b = RawProfile::builder("p");
        assert!(matches!(b.code("", 1), Err(NumericError::InvalidName(_))));
        assert!(matches!(
            b.alias("RPL_OK", "not valid"),
            Err(NumericError::InvalidName(_))
        ));
    }

    #[test]
    fn test_inherit_and_override() {
        let mut b = RawProfile::builder("child");
        b.inherit(&parent());
        b.code("RPL_BOUNCE", 10).unwrap();
        b.code("RPL_EXTRA", 42).unwrap();
        let child = b.build();

        assert_eq!(child.get("RPL_WELCOME"), Some(&RawTarget::Code(1)));
        assert_eq!(child.get("RPL_BOUNCE"), Some(&RawTarget::Code(10)));
        let names: Vec<&str> = child.entries().map(|(n, _)| n).collect();
        assert_eq!(names, ["RPL_WELCOME", "RPL_BOUNCE", "RPL_EXTRA"]);
    }

    #[test]
    fn test_own_definition_survives_late_inherit() {
        let mut b = RawProfile::builder("child");
        b.code("RPL_BOUNCE", 10).unwrap();
        b.inherit(&parent());
        let child = b.build();
        assert_eq!(child.get("RPL_BOUNCE"), Some(&RawTarget::Code(10)));
        assert_eq!(child.len(), 2);
    }

    #[test]
    fn test_override_then_conflict() {
        let mut b = RawProfile::builder("child");
        b.inherit(&parent());
        b.code("RPL_BOUNCE", 10).unwrap();
        assert!(matches!(
            b.code("RPL_BOUNCE", 11),
            Err(NumericError::DefinitionConflict { .. })
        ));
    }

    #[test]
    fn test_entries_restartable() {
        let p = parent();
        assert_eq!(p.entries().count(), 2);
        assert_eq!(p.entries().count(), 2);
    }

    #[test]
    fn test_target_display() {
        assert_eq!(RawTarget::Code(5).to_string(), "005");
        assert_eq!(RawTarget::Alias("RPL_X".into()).to_string(), "RPL_X");
    }
}
