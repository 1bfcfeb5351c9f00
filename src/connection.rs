//! The connection contract seen by events, handlers and modules.
//!
//! Transport and I/O live outside this crate. What the core needs from a
//! connection is its configuration and its numeric profile; everything a
//! handler does with numerics goes through the latter.

use crate::casemap::CaseMapping;
use crate::config::{Config, ConfigError};
use crate::error::Result;
use crate::numeric::{NumericProfile, NumericReference, SharedNumerics};

/// An IRC connection, as far as the bot core is concerned.
///
/// Each connection owns its numeric profile; nothing mutable is shared
/// between connections.
pub trait Connection: Send + Sync {
    /// Configuration of this connection.
    fn config(&self) -> &Config;

    /// The connection's numeric profile.
    fn numerics(&self) -> &SharedNumerics;

    /// Case mapping used for nicknames and channels.
    fn casemapping(&self) -> CaseMapping {
        self.config().casemapping
    }

    /// Resolve a numeric name against the current profile.
    fn resolve(&self, name: &str) -> Result<Option<u16>> {
        self.numerics().read().resolve(name)
    }

    /// A late-bound reference to a numeric name.
    fn num_ref(&self, name: &str) -> Result<NumericReference> {
        NumericReference::new(self.numerics(), name)
    }
}

/// A connection holding nothing but its configuration and numerics.
///
/// Useful as the state half of a real connection, and in tests.
#[derive(Debug)]
pub struct BasicConnection {
    config: Config,
    numerics: SharedNumerics,
}

impl BasicConnection {
    /// Build a connection whose numerics come from `config`.
    pub fn new(config: Config) -> std::result::Result<Self, ConfigError> {
        let numerics = config.numeric_profile()?;
        Ok(Self::with_numerics(config, numerics))
    }

    /// Build a connection with an explicit numeric profile.
    pub fn with_numerics(config: Config, numerics: NumericProfile) -> Self {
        Self {
            config,
            numerics: numerics.into_shared(),
        }
    }
}

impl Connection for BasicConnection {
    fn config(&self) -> &Config {
        &self.config
    }

    fn numerics(&self) -> &SharedNumerics {
        &self.numerics
    }
}
