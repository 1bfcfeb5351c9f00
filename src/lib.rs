//! # erebot-core
//!
//! The protocol-facing core of an IRC bot: symbolic numeric resolution,
//! typed events, handlers and event filters.
//!
//! ## Features
//!
//! - Numeric profiles for RFC 1459, RFC 2812 and common IRCd extensions,
//!   stacked with last-registered-wins shadowing
//! - Late-bound numeric references that follow profile changes
//! - Events whose facets (channel, source, target, text) are fixed by kind
//! - Event and numeric handlers dispatched in registration order
//! - Composable filters on channel, source and message text
//! - TOML configuration with per-module settings

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use erebot_core::{
//!     BasicConnection, Config, Connection, Dispatcher, Event, NumericHandler,
//! };
//!
//! let conn: Arc<dyn Connection> = Arc::new(BasicConnection::new(Config::default()).unwrap());
//! let mut dispatcher = Dispatcher::new();
//!
//! let welcome = conn.num_ref("RPL_WELCOME").unwrap();
//! dispatcher.add_numeric_handler(NumericHandler::new(welcome, |event: &Event| {
//!     println!("logged in as {}", event.target().unwrap_or("?"));
//! }));
//!
//! let event = Event::numeric(Arc::clone(&conn), 1, "irc.example.com", "bot", "Welcome").unwrap();
//! assert_eq!(dispatcher.dispatch(&event).unwrap().fired, 1);
//! ```

pub mod casemap;
pub mod config;
pub mod connection;
pub mod error;
pub mod event;
pub mod handler;
pub mod identity;
pub mod matcher;
pub mod module;
pub mod numeric;
pub mod text;
pub mod util;

pub use self::casemap::{irc_eq, irc_to_lower, irc_to_upper, CaseMapping};
pub use self::config::{Config, ConfigError, ModuleSettings};
pub use self::connection::{BasicConnection, Connection};
pub use self::error::{DispatchError, EventError, NumericError, ProfileParseError};
pub use self::event::{Event, EventKind, Facets};
pub use self::handler::{Dispatch, Dispatcher, EventHandler, HandlerId, NumericHandler};
pub use self::identity::Identity;
pub use self::matcher::Match;
pub use self::module::{LoadedModule, Module, ModuleContext, ModuleError, ReloadFlags};
pub use self::numeric::{
    Numeric, NumericProfile, NumericReference, RawProfile, RawProfileBuilder, RawTarget,
    SharedNumerics,
};
pub use self::text::TextWrapper;
