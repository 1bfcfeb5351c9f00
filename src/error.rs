//! Error types for the bot core.
//!
//! This module defines the structural failures raised by numeric
//! resolution, event construction, dispatch and the raw profile format.
//! An unknown numeric name is not an error: resolution reports it as
//! `Ok(None)`.

use thiserror::Error;

/// Convenience type alias for Results using [`NumericError`].
pub type Result<T, E = NumericError> = std::result::Result<T, E>;

/// Structural failures of numeric resolution and profile composition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum NumericError {
    /// Alias chasing revisited a name.
    #[error("alias cycle detected while resolving {name}: {}", chain.join(" -> "))]
    CycleDetected {
        /// The name whose resolution was requested.
        name: String,
        /// Names visited, in order, ending with the revisited one.
        chain: Vec<String>,
    },

    /// Two contradictory definitions were given for the same name.
    #[error("conflicting definitions for {name} in profile {profile}: {existing} vs {new}")]
    DefinitionConflict {
        /// Profile being built or registered.
        profile: String,
        /// The conflicting symbolic name.
        name: String,
        /// Target already on record.
        existing: String,
        /// Target that was rejected.
        new: String,
    },

    /// A raw profile entry used a code outside `1..=999`.
    #[error("numeric {code} for {name} is outside 1..=999")]
    OutOfRange {
        /// The offending symbolic name.
        name: String,
        /// The rejected code.
        code: u32,
    },

    /// The lookup key is not a symbolic numeric name.
    #[error("invalid numeric name: {0:?}")]
    InvalidName(String),

    /// Mutation attempted on a read-only numeric profile.
    #[error("operation not supported: {0}")]
    NotImplemented(&'static str),

    /// A reference outlived the registry it resolves against.
    #[error("numeric reference {0} is detached from its profile")]
    Detached(String),
}

/// Failures while building events.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EventError {
    /// A value does not fit the API it was handed to.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Failures surfaced by the dispatcher.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DispatchError {
    /// A numeric handler could not resolve the numeric it is bound to.
    #[error("numeric handler {handler} failed: {source}")]
    Numeric {
        /// Identifier of the failing handler.
        handler: u64,
        /// The underlying resolution error.
        #[source]
        source: NumericError,
    },
}

/// Errors encountered when parsing the raw profile text format.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileParseError {
    /// A line did not match `NAME = CODE` or `NAME = OTHER_NAME`.
    #[error("line {line}: {context}")]
    Syntax {
        /// One-based line number.
        line: usize,
        /// Description of what was being parsed.
        context: String,
    },

    /// The parsed entries were rejected by the profile builder.
    #[error("line {line}: {source}")]
    Definition {
        /// One-based line number.
        line: usize,
        /// The rejected definition.
        #[source]
        source: NumericError,
    },
}

/// Errors raised by charset conversion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodingError {
    /// The charset label is not known.
    #[error("unknown charset: {0}")]
    UnknownCharset(String),
}
