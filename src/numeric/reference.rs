//! Late-bound numeric references.

use std::fmt;
use std::sync::Weak;

use parking_lot::RwLock;

use super::canonical_name;
use super::registry::{NumericProfile, SharedNumerics};
use crate::error::{NumericError, Result};

/// A symbolic numeric resolved against a connection's profile on every use.
///
/// The value is never cached: capability negotiation may register new raw
/// profiles mid-session, and the reference must follow. The reference holds
/// a weak handle and does not keep the profile alive.
///
/// # Example
///
/// ```
/// use erebot_core::numeric::{raw, NumericProfile, NumericReference, RawProfile};
/// use std::sync::Arc;
///
/// let numerics = NumericProfile::with_profiles([raw::rfc2812()]).unwrap().into_shared();
/// let bounce = NumericReference::new(&numerics, "RPL_BOUNCE").unwrap();
/// assert_eq!(bounce.value().unwrap(), Some(5));
///
/// let mut modern = RawProfile::builder("modern");
/// modern.code("RPL_BOUNCE", 10).unwrap();
/// numerics.write().register(Arc::new(modern.build())).unwrap();
/// assert_eq!(bounce.value().unwrap(), Some(10));
/// ```
#[derive(Clone)]
pub struct NumericReference {
    name: String,
    owner: Weak<RwLock<NumericProfile>>,
}

impl NumericReference {
    /// Bind `name` to the profile behind `owner`.
    pub fn new(owner: &SharedNumerics, name: &str) -> Result<Self> {
        Ok(Self {
            name: canonical_name(name)?,
            owner: std::sync::Arc::downgrade(owner),
        })
    }

    /// The symbolic name, in canonical form.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the name against the owner's current composition.
    pub fn value(&self) -> Result<Option<u16>> {
        let owner = self
            .owner
            .upgrade()
            .ok_or_else(|| NumericError::Detached(self.name.clone()))?;
        let numerics = owner.read();
        numerics.resolve(&self.name)
    }
}

impl PartialEq for NumericReference {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Weak::ptr_eq(&self.owner, &other.owner)
    }
}

impl Eq for NumericReference {}

impl fmt::Debug for NumericReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericReference")
            .field("name", &self.name)
            .field("attached", &(self.owner.strong_count() > 0))
            .finish()
    }
}

impl fmt::Display for NumericReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A numeric as handlers see it: a literal code or a late-bound name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Numeric {
    /// A literal code.
    Code(u16),
    /// A symbolic name resolved at use time.
    Reference(NumericReference),
}

impl Numeric {
    /// The code this numeric currently stands for.
    pub fn resolve(&self) -> Result<Option<u16>> {
        match self {
            Self::Code(code) => Ok(Some(*code)),
            Self::Reference(reference) => reference.value(),
        }
    }
}

impl From<u16> for Numeric {
    fn from(code: u16) -> Self {
        Self::Code(code)
    }
}

impl From<NumericReference> for Numeric {
    fn from(reference: NumericReference) -> Self {
        Self::Reference(reference)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{:03}", code),
            Self::Reference(reference) => reference.fmt(f),
        }
    }
}
