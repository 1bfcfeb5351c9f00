//! Per-connection composition of raw profiles.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::raw::{RawProfile, RawTarget};
use super::{aliases, canonical_name};
use crate::error::{NumericError, Result};

/// Shared handle to the numeric profile of one connection.
///
/// The connection owns the only strong handle; numeric references keep a
/// weak one so they always see the current composition.
pub type SharedNumerics = Arc<RwLock<NumericProfile>>;

/// An ordered stack of raw profiles.
///
/// Profiles registered later shadow profiles registered earlier. Lookups
/// are case-insensitive and follow both the aliases declared by the
/// profiles and the cross-IRCd [`aliases::EQUIVALENTS`] table.
#[derive(Clone, Debug, Default)]
pub struct NumericProfile {
    profiles: Vec<Arc<RawProfile>>,
}

impl NumericProfile {
    /// Create an empty profile stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack from profiles, in registration order.
    pub fn with_profiles<I>(profiles: I) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<RawProfile>>,
    {
        let mut numerics = Self::new();
        numerics.set_profiles(profiles)?;
        Ok(numerics)
    }

    /// Wrap this stack into a handle that can be shared with references.
    pub fn into_shared(self) -> SharedNumerics {
        Arc::new(RwLock::new(self))
    }

    /// Append `profile` to the stack.
    ///
    /// Registering a profile that is already present (the same instance, or
    /// an identical table under the same name) does nothing and returns
    /// `Ok(false)`. A different table under an already registered name is a
    /// [`NumericError::DefinitionConflict`].
    pub fn register(&mut self, profile: Arc<RawProfile>) -> Result<bool> {
        if let Some(existing) = self.profiles.iter().find(|p| p.name() == profile.name()) {
            if Arc::ptr_eq(existing, &profile) || **existing == *profile {
                debug!(profile = profile.name(), "numeric profile already registered");
                return Ok(false);
            }
            return Err(conflict(existing, &profile));
        }

        debug!(
            profile = profile.name(),
            entries = profile.len(),
            position = self.profiles.len(),
            "registered numeric profile"
        );
        self.profiles.push(profile);
        Ok(true)
    }

    /// Append several profiles; returns how many were actually added.
    pub fn set_profiles<I>(&mut self, profiles: I) -> Result<usize>
    where
        I: IntoIterator<Item = Arc<RawProfile>>,
    {
        let mut added = 0;
        for profile in profiles {
            if self.register(profile)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove the profile registered under `profile`'s name.
    ///
    /// Returns whether something was removed.
    pub fn unregister(&mut self, profile: &RawProfile) -> bool {
        let before = self.profiles.len();
        self.profiles.retain(|p| p.name() != profile.name());
        let removed = self.profiles.len() != before;
        if removed {
            debug!(profile = profile.name(), "unregistered numeric profile");
        }
        removed
    }

    /// Number of registered profiles.
    pub fn count(&self) -> usize {
        self.profiles.len()
    }

    /// Names of the registered profiles, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name())
    }

    /// The registered profiles, in registration order.
    pub fn profiles(&self) -> impl Iterator<Item = &Arc<RawProfile>> {
        self.profiles.iter()
    }

    /// Resolve a symbolic name to its numeric code.
    ///
    /// Profiles are searched most recently registered first, and each one is
    /// chased to exhaustion before the next is considered. `Ok(None)` means
    /// no profile defines the name. Names are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// [`NumericError::InvalidName`] for keys that are not numeric names and
    /// [`NumericError::CycleDetected`] when a profile's aliases loop.
    pub fn resolve(&self, name: &str) -> Result<Option<u16>> {
        let name = canonical_name(name)?;
        for profile in self.profiles.iter().rev() {
            if let Some(code) = resolve_in(profile, &name)? {
                return Ok(Some(code));
            }
        }
        Ok(None)
    }

    /// Whether `name` currently resolves to a code.
    pub fn has(&self, name: &str) -> Result<bool> {
        Ok(self.resolve(name)?.is_some())
    }

    /// Names mapped directly to `code`, most recently registered profile first.
    pub fn reverse(&self, code: u16) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for profile in self.profiles.iter().rev() {
            for (name, target) in profile.entries() {
                if target.code() == Some(code) && !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Numeric profiles are read-only; compose raw profiles instead.
    pub fn define(&mut self, _name: &str, _code: u16) -> Result<()> {
        Err(NumericError::NotImplemented(
            "defining numerics on a composed profile",
        ))
    }

    /// Numeric profiles are read-only; unregister a raw profile instead.
    pub fn undefine(&mut self, _name: &str) -> Result<()> {
        Err(NumericError::NotImplemented(
            "removing numerics from a composed profile",
        ))
    }
}

/// Chase `start` through one profile.
fn resolve_in(profile: &RawProfile, start: &str) -> Result<Option<u16>> {
    let mut chain: Vec<&str> = Vec::new();
    let mut current = start;

    loop {
        if chain.contains(&current) {
            let mut chain: Vec<String> = chain.iter().map(|n| n.to_string()).collect();
            chain.push(current.to_owned());
            warn!(profile = profile.name(), name = start, "numeric alias cycle");
            return Err(NumericError::CycleDetected {
                name: start.to_owned(),
                chain,
            });
        }
        chain.push(current);

        match profile.get(current) {
            Some(RawTarget::Code(code)) => return Ok(Some(*code)),
            Some(RawTarget::Alias(next)) => current = next,
            None => match aliases::equivalents(current).find(|alt| !chain.contains(alt)) {
                Some(alt) => current = alt,
                None => return Ok(None),
            },
        }
    }
}

fn conflict(existing: &RawProfile, new: &RawProfile) -> NumericError {
    let differing = new
        .entries()
        .find(|(name, target)| existing.get(name) != Some(*target))
        .map(|(name, target)| {
            let old = existing
                .get(name)
                .map_or_else(|| "undefined".to_owned(), ToString::to_string);
            (name.to_owned(), old, target.to_string())
        })
        .or_else(|| {
            existing
                .entries()
                .find(|(name, _)| !new.contains(name))
                .map(|(name, target)| (name.to_owned(), target.to_string(), "undefined".to_owned()))
        })
        .unwrap_or_else(|| (String::new(), String::new(), String::new()));

    NumericError::DefinitionConflict {
        profile: new.name().to_owned(),
        name: differing.0,
        existing: differing.1,
        new: differing.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, codes: &[(&str, u16)], aliases: &[(&str, &str)]) -> Arc<RawProfile> {
        let mut b = RawProfile::builder(name);
        b.codes(codes).unwrap();
        b.aliases(aliases).unwrap();
        Arc::new(b.build())
    }

    #[test]
    fn test_empty_profile_resolves_nothing() {
        let numerics = NumericProfile::new();
        assert_eq!(numerics.resolve("RPL_WELCOME").unwrap(), None);
        assert_eq!(numerics.count(), 0);
    }

    #[test]
    fn test_case_insensitive() {
        let numerics =
            NumericProfile::with_profiles([profile("a", &[("RPL_WELCOME", 1)], &[])]).unwrap();
        assert_eq!(numerics.resolve("rpl_welcome").unwrap(), Some(1));
        assert_eq!(numerics.resolve("Rpl_Welcome").unwrap(), Some(1));
    }

    #[test]
    fn test_later_profile_shadows() {
        let numerics = NumericProfile::with_profiles([
            profile("a", &[("RPL_X", 100)], &[]),
            profile("b", &[("RPL_X", 200)], &[]),
        ])
        .unwrap();
        assert_eq!(numerics.resolve("RPL_X").unwrap(), Some(200));
    }

    #[test]
    fn test_shadowing_through_alias() {
        let numerics = NumericProfile::with_profiles([
            profile("a", &[("RPL_X", 100), ("RPL_Y", 300)], &[]),
            profile("b", &[], &[("RPL_X", "RPL_Y")]),
        ])
        .unwrap();
        // "b" has no code for RPL_Y, so its alias chain is exhausted there.
        assert_eq!(numerics.resolve("RPL_X").unwrap(), Some(100));

        let numerics = NumericProfile::with_profiles([
            profile("a", &[("RPL_X", 100)], &[]),
            profile("b", &[("RPL_Y", 300)], &[("RPL_X", "RPL_Y")]),
        ])
        .unwrap();
        assert_eq!(numerics.resolve("RPL_X").unwrap(), Some(300));
    }

    #[test]
    fn test_builtin_equivalents() {
        let numerics = NumericProfile::with_profiles([profile(
            "a",
            &[("ERR_ALREADYREGISTRED", 462)],
            &[],
        )])
        .unwrap();
        assert_eq!(numerics.resolve("ERR_ALREADYREGISTERED").unwrap(), Some(462));
        assert_eq!(numerics.resolve("ERR_ALREADYREGISTRED").unwrap(), Some(462));
    }

    #[test]
    fn test_equivalent_of_undefined_name_is_not_a_cycle() {
        let numerics = NumericProfile::with_profiles([profile("a", &[("RPL_WELCOME", 1)], &[])])
            .unwrap();
        assert_eq!(numerics.resolve("RPL_REDIR").unwrap(), None);
    }

    #[test]
    fn test_self_alias_is_a_cycle() {
        let numerics =
            NumericProfile::with_profiles([profile("a", &[], &[("RPL_LOOP", "RPL_LOOP")])])
                .unwrap();
        assert_eq!(
            numerics.resolve("rpl_loop").unwrap_err(),
            NumericError::CycleDetected {
                name: "RPL_LOOP".to_string(),
                chain: vec!["RPL_LOOP".to_string(), "RPL_LOOP".to_string()],
            }
        );
    }

    #[test]
    fn test_two_step_cycle() {
        let numerics = NumericProfile::with_profiles([profile(
            "a",
            &[],
            &[("RPL_A", "RPL_B"), ("RPL_B", "RPL_A")],
        )])
        .unwrap();
        assert!(matches!(
            numerics.resolve("RPL_A"),
            Err(NumericError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_has() {
        let numerics = NumericProfile::with_profiles([
            profile("a", &[("RPL_WELCOME", 1)], &[]),
            profile("b", &[], &[("RPL_LOOP", "RPL_LOOP")]),
        ])
        .unwrap();
        assert!(numerics.has("RPL_WELCOME").unwrap());
        assert!(numerics.has("rpl_welcome").unwrap());
        assert!(!numerics.has("RPL_NOSUCHTHING").unwrap());
        assert!(matches!(
            numerics.has("RPL_LOOP"),
            Err(NumericError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_set_profiles_counts_new_ones() {
        let a = profile("a", &[("RPL_X", 100)], &[]);
        let b = profile("b", &[("RPL_X", 200)], &[]);
        let mut numerics = NumericProfile::new();
        assert_eq!(
            numerics
                .set_profiles([Arc::clone(&a), Arc::clone(&a), Arc::clone(&b)])
                .unwrap(),
            2
        );
        assert_eq!(numerics.count(), 2);
        assert_eq!(numerics.set_profiles([a, b]).unwrap(), 0);
        assert_eq!(numerics.resolve("RPL_X").unwrap(), Some(200));
    }

    #[test]
    fn test_invalid_name() {
        let numerics = NumericProfile::new();
        assert!(matches!(
            numerics.resolve("not a name"),
            Err(NumericError::InvalidName(_))
        ));
    }

    #[test]
    fn test_register_is_idempotent() {
        let a = profile("a", &[("RPL_X", 100)], &[]);
        let mut numerics = NumericProfile::new();
        assert!(numerics.register(a.clone()).unwrap());
        assert!(!numerics.register(a.clone()).unwrap());
        assert!(!numerics
            .register(profile("a", &[("RPL_X", 100)], &[]))
            .unwrap());
        assert_eq!(numerics.count(), 1);
    }

    #[test]
    fn test_register_conflicting_table() {
        let mut numerics = NumericProfile::new();
        numerics.register(profile("a", &[("RPL_X", 100)], &[])).unwrap();
        let err = numerics
            .register(profile("a", &[("RPL_X", 101)], &[]))
            .unwrap_err();
        assert_eq!(
            err,
            NumericError::DefinitionConflict {
                profile: "a".to_string(),
                name: "RPL_X".to_string(),
                existing: "100".to_string(),
                new: "101".to_string(),
            }
        );
    }

    #[test]
    fn test_unregister() {
        let a = profile("a", &[("RPL_X", 100)], &[]);
        let b = profile("b", &[("RPL_X", 200)], &[]);
        let mut numerics = NumericProfile::with_profiles([a, b.clone()]).unwrap();
        assert!(numerics.unregister(&b));
        assert!(!numerics.unregister(&b));
        assert_eq!(numerics.resolve("RPL_X").unwrap(), Some(100));
    }

    #[test]
    fn test_names_in_registration_order() {
        let numerics = NumericProfile::with_profiles([
            profile("first", &[], &[]),
            profile("second", &[], &[]),
        ])
        .unwrap();
        assert_eq!(numerics.names().collect::<Vec<_>>(), ["first", "second"]);
    }

    #[test]
    fn test_reverse_lookup() {
        let numerics = NumericProfile::with_profiles([
            profile("a", &[("RPL_BOUNCE", 5)], &[]),
            profile("b", &[("RPL_ISUPPORT", 5), ("RPL_BOUNCE", 10)], &[]),
        ])
        .unwrap();
        assert_eq!(numerics.reverse(5), ["RPL_ISUPPORT", "RPL_BOUNCE"]);
        assert!(numerics.reverse(999).is_empty());
    }

    #[test]
    fn test_mutation_is_not_implemented() {
        let mut numerics = NumericProfile::new();
        assert!(matches!(
            numerics.define("RPL_X", 1),
            Err(NumericError::NotImplemented(_))
        ));
        assert!(matches!(
            numerics.undefine("RPL_X"),
            Err(NumericError::NotImplemented(_))
        ));
    }
}
