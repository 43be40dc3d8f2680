use parking_lot::RwLock;

use crate::value::{FlagKind, FlagType, FlagValue};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("No flag named `{0}` is defined")]
    NotFound(String),

    #[error("Flag `{name}` holds a {expected} value and cannot be updated with a {found} value")]
    KindMismatch {
        name: String,
        expected: FlagKind,
        found: FlagKind,
    },
}

/// A single named flag.
///
/// The name and description are fixed at creation. The value sits behind its
/// own reader-writer lock, so reads and writes of one flag never contend with
/// another flag. Callers only ever see copies of the value or go through
/// [`Flag::update`] / [`Flag::update_typed`].
pub struct Flag {
    name: String,
    description: String,
    value: RwLock<FlagValue>,
}

impl std::fmt::Debug for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("value", &*self.value.read())
            .finish()
    }
}

impl Flag {
    pub(crate) fn new(name: String, value: FlagValue, description: String) -> Self {
        Self {
            name,
            description,
            value: RwLock::new(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// A copy of the current value.
    pub fn value(&self) -> FlagValue {
        self.value.read().clone()
    }

    pub fn kind(&self) -> FlagKind {
        self.value.read().kind()
    }

    /// The current value as `T`, if the flag holds `T`'s kind right now.
    pub fn get<T: FlagType>(&self) -> Option<T> {
        T::from_flag_value(&self.value.read())
    }

    /// Replace the value, whatever kind it held before.
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip_all, fields(name = %self.name)))]
    pub fn update(&self, new_value: impl Into<FlagValue>) {
        let new_value = new_value.into();
        let to = new_value.kind();

        let previous = std::mem::replace(&mut *self.value.write(), new_value);

        tracing::trace!(name = %self.name, from = %previous.kind(), %to, "Updated flag");
    }

    /// Replace the value only if `new_value` has the same kind as the current value.
    ///
    /// The check and the write happen under one write lock.
    #[cfg_attr(feature = "tracing-instrument", tracing::instrument(skip_all, fields(name = %self.name)))]
    pub fn update_typed(&self, new_value: impl Into<FlagValue>) -> Result<(), UpdateError> {
        let new_value = new_value.into();
        let mut value = self.value.write();

        let expected = value.kind();
        let found = new_value.kind();
        if expected != found {
            drop(value);
            tracing::debug!(name = %self.name, %expected, %found, "Rejected flag update of a different kind");
            return Err(UpdateError::KindMismatch {
                name: self.name.clone(),
                expected,
                found,
            });
        }

        *value = new_value;
        drop(value);

        tracing::trace!(name = %self.name, kind = %found, "Updated flag");

        Ok(())
    }
}
