mod builder;
mod flag;
pub mod flags;
mod registry;
mod snapshot;
mod value;

#[cfg(test)]
mod test;

pub use builder::Builder;
pub use flag::{Flag, UpdateError};
pub use registry::Registry;
pub use snapshot::{Snapshot, SnapshotEntry};
pub use value::{FlagKind, FlagType, FlagValue, FlagValueError};
