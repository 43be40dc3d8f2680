//! Free functions over one process-wide [`Registry`].
//!
//! The process-wide registry is created on first use and lives until the
//! process exits. Prefer passing a [`Registry`] around explicitly; these
//! functions exist for code that cannot.
//!
//! ```rust
//! use flag_registry::flags;
//!
//! flags::define("docs_dark_mode", true, "Enable dark mode UI");
//! assert!(flags::is_enabled("docs_dark_mode"));
//!
//! flags::update("docs_dark_mode", false);
//! assert!(!flags::is_enabled("docs_dark_mode"));
//! ```

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::{Flag, FlagType, FlagValue, Registry, Snapshot, UpdateError};

static GLOBAL: Lazy<Registry> = Lazy::new(|| {
    tracing::trace!("Creating the process-wide flag registry");
    Registry::new()
});

pub fn global() -> &'static Registry {
    &GLOBAL
}

pub fn define(
    name: impl Into<String>,
    default_value: impl Into<FlagValue>,
    description: impl Into<String>,
) -> Arc<Flag> {
    global().define(name, default_value, description)
}

pub fn get(name: &str) -> Option<Arc<Flag>> {
    global().get(name)
}

pub fn exists(name: &str) -> bool {
    global().exists(name)
}

pub fn update(name: &str, new_value: impl Into<FlagValue>) -> bool {
    global().update(name, new_value)
}

pub fn update_typed(name: &str, new_value: impl Into<FlagValue>) -> Result<(), UpdateError> {
    global().update_typed(name, new_value)
}

pub fn is_enabled(name: &str) -> bool {
    global().is_enabled(name)
}

pub fn get_value<T: FlagType>(name: &str) -> Option<T> {
    global().get_value(name)
}

pub fn get_all() -> Vec<Arc<Flag>> {
    global().get_all()
}

pub fn snapshot() -> Snapshot {
    global().snapshot()
}
