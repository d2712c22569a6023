//! In-memory map of config name to entry. A data structure, not a policy: the Store
//! carries no context and does not evaluate.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::entry::ConfigEntry;

#[derive(Default)]
pub struct Store {
    entries: RwLock<HashMap<String, ConfigEntry>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any existing entry with the same name. Returns `true` if the
    /// serialized shape (value + overrides) changed, so callers can decide whether a
    /// notification is owed. A byte-equal replacement is not a change.
    pub fn upsert(&self, entry: ConfigEntry) -> bool {
        let mut entries = self.entries.write();
        let changed = match entries.get(&entry.name) {
            Some(existing) => existing != &entry,
            None => true,
        };
        entries.insert(entry.name.clone(), entry);
        changed
    }

    /// Applies a whole delivery batch and returns the set of names whose value
    /// semantics changed, for the Lifecycle to fan out as a single notification pass.
    pub fn upsert_many(&self, delivered: Vec<ConfigEntry>) -> HashSet<String> {
        let mut entries = self.entries.write();
        let mut changed = HashSet::new();
        for entry in delivered {
            let is_change = match entries.get(&entry.name) {
                Some(existing) => existing != &entry,
                None => true,
            };
            if is_change {
                changed.insert(entry.name.clone());
            }
            entries.insert(entry.name.clone(), entry);
        }
        changed
    }

    pub fn read(&self, name: &str) -> Option<ConfigEntry> {
        self.entries.read().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Single read-guard pass over every entry, for the Snapshot Codec.
    pub fn snapshot_entries(&self) -> Vec<ConfigEntry> {
        self.entries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn byte_equal_replacement_is_not_a_change() {
        let store = Store::new();
        let entry = ConfigEntry::new("feature", json!(true));
        assert!(store.upsert(entry.clone()));
        assert!(!store.upsert(entry));
    }

    #[test]
    fn changed_value_is_a_change() {
        let store = Store::new();
        store.upsert(ConfigEntry::new("feature", json!(true)));
        assert!(store.upsert(ConfigEntry::new("feature", json!(false))));
    }

    #[test]
    fn upsert_many_reports_only_changed_names() {
        let store = Store::new();
        store.upsert(ConfigEntry::new("a", json!(1)));
        store.upsert(ConfigEntry::new("b", json!(2)));

        let changed = store.upsert_many(vec![
            ConfigEntry::new("a", json!(1)),
            ConfigEntry::new("b", json!(99)),
            ConfigEntry::new("c", json!(3)),
        ]);

        assert_eq!(changed, HashSet::from(["b".to_string(), "c".to_string()]));
    }
}
