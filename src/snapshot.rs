use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::flag::Flag;
use crate::value::FlagValue;

/// One flag's value and description at the moment a [`Snapshot`] was taken.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub value: FlagValue,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl From<&Flag> for SnapshotEntry {
    fn from(flag: &Flag) -> Self {
        Self {
            value: flag.value(),
            description: flag.description().to_owned(),
        }
    }
}

impl SnapshotEntry {
    pub fn diff(&self, previous: &Self) -> String {
        if self == previous {
            return "no change".into();
        }

        let mut diff: Vec<String> = vec![];
        if self.value != previous.value {
            diff.push(format!("value: {:?} -> {:?}", previous.value, self.value));
        }

        if self.description != previous.description {
            diff.push(format!(
                "description: {:?} -> {:?}",
                previous.description, self.description
            ));
        }

        diff.join(", ")
    }
}

/// A copy of every flag's value, ordered by name.
///
/// Taken with [`crate::Registry::snapshot`]. A snapshot can seed a new
/// registry through [`crate::Builder::set_flags`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, SnapshotEntry>);

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name).map(|entry| &entry.value)
    }

    pub fn entry(&self, name: &str) -> Option<&SnapshotEntry> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SnapshotEntry)> {
        self.0.iter()
    }

    /// Every difference from `prev`, one line per flag, in name order.
    pub fn changes(&self, prev: &Snapshot) -> Vec<String> {
        if self == prev {
            return vec![];
        }

        let mut changes: Vec<String> = vec![];

        let all_names: BTreeSet<&String> = self.0.keys().chain(prev.0.keys()).collect();
        for name in all_names {
            match (self.0.get(name), prev.0.get(name)) {
                (None, None) => continue,
                (None, Some(entry)) => changes.push(format!("-flag:{name}:{entry:?}")),
                (Some(entry), None) => changes.push(format!("+flag:{name}:{entry:?}")),
                (Some(current), Some(previous)) if current == previous => continue,
                (Some(current), Some(previous)) => {
                    changes.push(format!("~flag:{name}:{}", current.diff(previous)))
                }
            }
        }

        changes
    }
}

impl FromIterator<(String, SnapshotEntry)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, SnapshotEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Snapshot {
    type Item = (String, SnapshotEntry);
    type IntoIter = std::collections::btree_map::IntoIter<String, SnapshotEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
