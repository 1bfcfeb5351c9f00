//! Bot modules.
//!
//! A [`Module`] registers handlers through a [`ModuleContext`], which keeps
//! track of them so that they can all be removed when the module is
//! reloaded or unloaded. [`LoadedModule`] drives that life cycle.

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ModuleSettings};
use crate::connection::Connection;
use crate::error::NumericError;
use crate::handler::{Dispatcher, EventHandler, HandlerId, NumericHandler};
use crate::numeric::NumericReference;

/// Errors raised by modules.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModuleError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Numeric(#[from] NumericError),
    #[error("module {module} failed: {reason}")]
    Failed { module: String, reason: String },
}

/// What a reload should refresh.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReloadFlags(u8);

impl ReloadFlags {
    /// Register handlers.
    pub const HANDLERS: Self = Self(1);
    /// Reset the module's own state.
    pub const MEMBERS: Self = Self(1 << 1);
    /// First load.
    pub const INIT: Self = Self(1 << 2);
    pub const ALL: Self = Self(0b111);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for ReloadFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for ReloadFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        for (flag, name) in [
            (Self::HANDLERS, "HANDLERS"),
            (Self::MEMBERS, "MEMBERS"),
            (Self::INIT, "INIT"),
        ] {
            if self.contains(flag) {
                names.push(name);
            }
        }
        write!(f, "ReloadFlags({})", names.join(" | "))
    }
}

/// A unit of bot behaviour attached to one connection.
pub trait Module: Send {
    /// Name used to look up the module's settings.
    fn name(&self) -> &str;

    /// (Re)initialize the module.
    ///
    /// Handlers registered during a previous load are already gone when
    /// `flags` contains [`ReloadFlags::HANDLERS`].
    fn reload(&mut self, ctx: &mut ModuleContext<'_>, flags: ReloadFlags) -> Result<(), ModuleError>;

    /// Called before the module's handlers are removed for good.
    fn unload(&mut self, _ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        Ok(())
    }
}

/// What a module sees of its connection while loading.
pub struct ModuleContext<'a> {
    module: &'a str,
    connection: &'a Arc<dyn Connection>,
    dispatcher: &'a mut Dispatcher,
    handlers: &'a mut Vec<HandlerId>,
}

impl<'a> ModuleContext<'a> {
    pub fn connection(&self) -> &Arc<dyn Connection> {
        self.connection
    }

    /// This module's configuration section.
    pub fn settings(&self) -> ModuleSettings {
        self.connection.config().module(self.module)
    }

    /// A late-bound reference to a numeric name.
    pub fn num_ref(&self, name: &str) -> Result<NumericReference, ModuleError> {
        Ok(self.connection.num_ref(name)?)
    }

    pub fn register_event_handler(&mut self, handler: EventHandler) -> HandlerId {
        let id = self.dispatcher.add_event_handler(handler);
        self.handlers.push(id);
        id
    }

    pub fn register_numeric_handler(&mut self, handler: NumericHandler) -> HandlerId {
        let id = self.dispatcher.add_numeric_handler(handler);
        self.handlers.push(id);
        id
    }

    /// Remove one handler registered by this module.
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let Some(pos) = self.handlers.iter().position(|h| *h == id) else {
            return false;
        };
        self.handlers.remove(pos);
        self.dispatcher.remove_handler(id)
    }

    /// Remove every handler registered by this module.
    pub fn release(&mut self) -> usize {
        let released = self.handlers.len();
        for id in self.handlers.drain(..) {
            self.dispatcher.remove_handler(id);
        }
        released
    }
}

/// A module together with the handlers it registered.
pub struct LoadedModule {
    module: Box<dyn Module>,
    handlers: Vec<HandlerId>,
}

impl LoadedModule {
    /// Load `module` with [`ReloadFlags::ALL`].
    ///
    /// Handlers registered before a failure are removed again.
    pub fn load(
        module: Box<dyn Module>,
        connection: &Arc<dyn Connection>,
        dispatcher: &mut Dispatcher,
    ) -> Result<Self, ModuleError> {
        let mut loaded = Self {
            module,
            handlers: Vec::new(),
        };
        if let Err(err) = loaded.reload(connection, dispatcher, ReloadFlags::ALL) {
            let released = loaded.handlers.len();
            for id in loaded.handlers.drain(..) {
                dispatcher.remove_handler(id);
            }
            warn!(module = loaded.name(), released, error = %err, "module failed to load");
            return Err(err);
        }
        info!(module = loaded.name(), handlers = loaded.handlers.len(), "module loaded");
        Ok(loaded)
    }

    pub fn name(&self) -> &str {
        self.module.name()
    }

    pub fn handlers(&self) -> &[HandlerId] {
        &self.handlers
    }

    /// Reload the module; with [`ReloadFlags::HANDLERS`] its previous
    /// handlers are removed first.
    pub fn reload(
        &mut self,
        connection: &Arc<dyn Connection>,
        dispatcher: &mut Dispatcher,
        flags: ReloadFlags,
    ) -> Result<(), ModuleError> {
        let name = self.module.name().to_owned();
        let mut ctx = ModuleContext {
            module: &name,
            connection,
            dispatcher,
            handlers: &mut self.handlers,
        };
        if flags.contains(ReloadFlags::HANDLERS) {
            let released = ctx.release();
            if released > 0 {
                debug!(module = %name, released, "dropped handlers before reload");
            }
        }
        self.module.reload(&mut ctx, flags)
    }

    /// Unload the module and remove all of its handlers.
    pub fn unload(
        mut self,
        connection: &Arc<dyn Connection>,
        dispatcher: &mut Dispatcher,
    ) -> Result<(), ModuleError> {
        let name = self.module.name().to_owned();
        let mut ctx = ModuleContext {
            module: &name,
            connection,
            dispatcher,
            handlers: &mut self.handlers,
        };
        let result = self.module.unload(&mut ctx);
        let released = ctx.release();
        info!(module = %name, released, "module unloaded");
        result
    }
}

impl fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModule")
            .field("name", &self.name())
            .field("handlers", &self.handlers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::connection::BasicConnection;
    use crate::event::{Event, EventKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CONFIG: &str = r#"
[modules.greeter]
greeting = "hello"
"#;

    #[derive(Default)]
    struct Greeter {
        greeting: String,
        loads: usize,
        hits: Arc<AtomicUsize>,
    }

    impl Module for Greeter {
        fn name(&self) -> &str {
            "greeter"
        }

        fn reload(&mut self, ctx: &mut ModuleContext<'_>, flags: ReloadFlags) -> Result<(), ModuleError> {
            self.loads += 1;
            if flags.contains(ReloadFlags::MEMBERS) {
                self.greeting = ctx.settings().parse_string("greeting", Some("hi"))?;
            }
            if flags.contains(ReloadFlags::HANDLERS) {
                let hits = Arc::clone(&self.hits);
                ctx.register_event_handler(EventHandler::new(move |_: &Event| {
                    hits.fetch_add(1, Ordering::SeqCst);
                }));
                let welcome = ctx.num_ref("RPL_WELCOME")?;
                ctx.register_numeric_handler(NumericHandler::new(welcome, |_: &Event| {}));
            }
            Ok(())
        }
    }

    fn setup() -> (Arc<dyn Connection>, Dispatcher) {
        let config = Config::from_toml_str(CONFIG).unwrap();
        let conn: Arc<dyn Connection> = Arc::new(BasicConnection::new(config).unwrap());
        (conn, Dispatcher::new())
    }

    #[test]
    fn test_flags() {
        let flags = ReloadFlags::HANDLERS | ReloadFlags::INIT;
        assert!(flags.contains(ReloadFlags::INIT));
        assert!(!flags.contains(ReloadFlags::MEMBERS));
        assert!(ReloadFlags::ALL.contains(flags));
        assert_eq!(format!("{:?}", flags), "ReloadFlags(HANDLERS | INIT)");
    }

    #[test]
    fn test_load_registers_handlers() {
        let (conn, mut dispatcher) = setup();
        let loaded = LoadedModule::load(Box::<Greeter>::default(), &conn, &mut dispatcher).unwrap();
        assert_eq!(loaded.name(), "greeter");
        assert_eq!(loaded.handlers().len(), 2);
        assert_eq!(dispatcher.len(), 2);
    }

    #[test]
    fn test_reload_replaces_handlers() {
        let (conn, mut dispatcher) = setup();
        let greeter = Greeter::default();
        let hits = Arc::clone(&greeter.hits);
        let mut loaded = LoadedModule::load(Box::new(greeter), &conn, &mut dispatcher).unwrap();

        loaded.reload(&conn, &mut dispatcher, ReloadFlags::HANDLERS).unwrap();
        assert_eq!(dispatcher.len(), 2);

        let event = Event::new(Arc::clone(&conn), EventKind::Connect).unwrap();
        dispatcher.dispatch(&event).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        loaded.reload(&conn, &mut dispatcher, ReloadFlags::MEMBERS).unwrap();
        assert_eq!(dispatcher.len(), 2);
    }

    #[test]
    fn test_unload_releases_everything() {
        let (conn, mut dispatcher) = setup();
        let other = dispatcher.add_event_handler(EventHandler::new(|_: &Event| {}));
        let loaded = LoadedModule::load(Box::<Greeter>::default(), &conn, &mut dispatcher).unwrap();
        assert_eq!(dispatcher.len(), 3);

        loaded.unload(&conn, &mut dispatcher).unwrap();
        assert_eq!(dispatcher.len(), 1);
        assert!(dispatcher.remove_handler(other));
    }

    #[test]
    fn test_settings_reach_module() {
        struct Probe(Arc<parking_lot::Mutex<String>>);

        impl Module for Probe {
            fn name(&self) -> &str {
                "greeter"
            }

            fn reload(&mut self, ctx: &mut ModuleContext<'_>, _: ReloadFlags) -> Result<(), ModuleError> {
                *self.0.lock() = ctx.settings().parse_string("greeting", None)?;
                Ok(())
            }
        }

        let (conn, mut dispatcher) = setup();
        let seen = Arc::new(parking_lot::Mutex::new(String::new()));
        LoadedModule::load(Box::new(Probe(Arc::clone(&seen))), &conn, &mut dispatcher).unwrap();
        assert_eq!(*seen.lock(), "hello");
    }

    #[test]
    fn test_unregister_single_handler() {
        struct Once;

        impl Module for Once {
            fn name(&self) -> &str {
                "once"
            }

            fn reload(&mut self, ctx: &mut ModuleContext<'_>, _: ReloadFlags) -> Result<(), ModuleError> {
                let a = ctx.register_event_handler(EventHandler::new(|_: &Event| {}));
                ctx.register_event_handler(EventHandler::new(|_: &Event| {}));
                assert!(ctx.unregister(a));
                assert!(!ctx.unregister(a));
                Ok(())
            }
        }

        let (conn, mut dispatcher) = setup();
        let loaded = LoadedModule::load(Box::new(Once), &conn, &mut dispatcher).unwrap();
        assert_eq!(loaded.handlers().len(), 1);
        assert_eq!(dispatcher.len(), 1);
    }

    #[test]
    fn test_failed_load_leaves_no_handlers() {
        struct Broken;

        impl Module for Broken {
            fn name(&self) -> &str {
                "broken"
            }

            fn reload(&mut self, ctx: &mut ModuleContext<'_>, _: ReloadFlags) -> Result<(), ModuleError> {
                ctx.register_event_handler(EventHandler::new(|_: &Event| {}));
                ctx.register_numeric_handler(NumericHandler::new(1u16, |_: &Event| {}));
                Err(ModuleError::Failed {
                    module: "broken".into(),
                    reason: "missing setting".into(),
                })
            }
        }

        let (conn, mut dispatcher) = setup();
        let kept = dispatcher.add_event_handler(EventHandler::new(|_: &Event| {}));
        let err = LoadedModule::load(Box::new(Broken), &conn, &mut dispatcher).unwrap_err();
        assert!(matches!(err, ModuleError::Failed { .. }));
        assert_eq!(dispatcher.len(), 1);
        assert!(dispatcher.remove_handler(kept));
    }
}
