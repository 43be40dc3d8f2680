use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::flag::{Flag, UpdateError};
use crate::snapshot::{Snapshot, SnapshotEntry};
use crate::value::{FlagType, FlagValue};
use crate::Builder;

/// A collection of flags, keyed by name.
///
/// The map of names has its own reader-writer lock, separate from each
/// flag's value lock. The map lock is only held while looking up, inserting
/// or listing entries, and is always released before a flag's value is
/// touched.
///
/// ```rust
/// use flag_registry::Registry;
///
/// let registry = Registry::new();
/// registry.define("max_connections", 100, "Maximum number of connections");
///
/// assert_eq!(registry.get_value::<i64>("max_connections"), Some(100));
/// assert!(registry.update("max_connections", 200));
/// assert_eq!(registry.get_value::<i64>("max_connections"), Some(200));
/// assert_eq!(registry.get_value::<f64>("max_connections"), None);
/// ```
#[derive(Default)]
pub struct Registry {
    entries: RwLock<HashMap<String, Arc<Flag>>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.len())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Define a flag, or return the existing flag of the same name.
    ///
    /// Defining is idempotent by name: when `name` already exists, the
    /// existing flag is returned untouched and `default_value` and
    /// `description` are discarded.
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip_all))]
    pub fn define(
        &self,
        name: impl Into<String>,
        default_value: impl Into<FlagValue>,
        description: impl Into<String>,
    ) -> Arc<Flag> {
        let mut entries = self.entries.write();

        match entries.entry(name.into()) {
            Entry::Occupied(existing) => {
                tracing::debug!(name = %existing.key(), "Flag is already defined, keeping the existing value");
                Arc::clone(existing.get())
            }
            Entry::Vacant(slot) => {
                let flag = Arc::new(Flag::new(
                    slot.key().clone(),
                    default_value.into(),
                    description.into(),
                ));
                tracing::debug!(name = %flag.name(), kind = %flag.kind(), "Defined flag");
                slot.insert(Arc::clone(&flag));
                flag
            }
        }
    }

    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self), ret(level = tracing::Level::TRACE)))]
    pub fn get(&self, name: &str) -> Option<Arc<Flag>> {
        self.entries.read().get(name).cloned()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Set a flag's value, whatever kind it held before.
    ///
    /// Returns `false`, without creating anything, when no flag is named `name`.
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self, new_value)))]
    pub fn update(&self, name: &str, new_value: impl Into<FlagValue>) -> bool {
        let Some(flag) = self.get(name) else {
            tracing::debug!(%name, "Not updating an undefined flag");
            return false;
        };

        flag.update(new_value);
        true
    }

    /// Set a flag's value only if it keeps the kind the flag currently holds.
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self, new_value)))]
    pub fn update_typed(
        &self,
        name: &str,
        new_value: impl Into<FlagValue>,
    ) -> Result<(), UpdateError> {
        let Some(flag) = self.get(name) else {
            tracing::debug!(%name, "Not updating an undefined flag");
            return Err(UpdateError::NotFound(name.to_owned()));
        };

        flag.update_typed(new_value)
    }

    /// Every flag currently defined, in no particular order.
    pub fn get_all(&self) -> Vec<Arc<Flag>> {
        self.entries.read().values().cloned().collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// True only if the flag exists, holds a boolean, and that boolean is `true`.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get_value::<bool>(name).unwrap_or(false)
    }

    /// The flag's value, if it exists and currently holds exactly `T`'s kind.
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip(self)))]
    pub fn get_value<T: FlagType>(&self, name: &str) -> Option<T> {
        let flag = self.get(name)?;
        let value = flag.get::<T>();
        if value.is_none() {
            tracing::trace!(
                name,
                requested = %T::KIND,
                found = %flag.kind(),
                "Flag holds a different kind"
            );
        }
        value
    }

    pub fn get_value_or<T: FlagType>(&self, name: &str, fallback: T) -> T {
        self.get_value(name).unwrap_or(fallback)
    }

    /// Copy every flag's current value.
    ///
    /// Each flag is read under its own lock in turn; the result is not an
    /// atomic view across flags.
    pub fn snapshot(&self) -> Snapshot {
        self.get_all()
            .iter()
            .map(|flag| (flag.name().to_owned(), SnapshotEntry::from(flag.as_ref())))
            .collect()
    }
}
