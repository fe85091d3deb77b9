//! In-process memory addressed by concept, name and location.
//!
//! Entries are grouped by `(concept, name)` and carry the coordinates of the
//! cell they came from. A lookup by name at some coordinate returns the first
//! entry whose every `axis = index` pair also appears in the query, so a value
//! remembered at `{x=0}` is visible from `{x=0, y=3}` but not from
//! `{x=1, y=3}`. The flat key `concept|name|location` (`x0_y1`) is only used
//! to address and display entries.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use axial_core::Coords;
use serde_json::{Map, Value};
use tracing::trace;

const SEPARATOR: char = '|';

/// A key/value memory shared between cognition and perception.
#[derive(Debug, Default)]
pub struct LocationMemory {
    entries: Mutex<BTreeMap<(String, String), Vec<Entry>>>,
}

#[derive(Debug, Clone)]
struct Entry {
    coords: Coords,
    value: Value,
}

/// Build the storage key for an entry.
pub fn memory_key(concept: &str, name: &str, coords: &Coords) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        concept,
        name,
        coords.location_key(),
        sep = SEPARATOR
    )
}

impl LocationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` for `name` at `coords`, replacing any previous entry
    /// at the same coordinates. Returns the entry's key.
    pub fn remember(&self, concept: &str, name: &str, value: Value, coords: &Coords) -> String {
        let key = memory_key(concept, name, coords);
        trace!(%key, "remember");
        let mut entries = self.lock();
        let slot = entries
            .entry((concept.to_string(), name.to_string()))
            .or_default();
        match slot.iter().position(|e| &e.coords == coords) {
            Some(i) => slot[i].value = value,
            None => slot.push(Entry {
                coords: coords.clone(),
                value,
            }),
        }
        key
    }

    /// First value remembered for `name` at a location within `coords`.
    pub fn recollect(&self, name: &str, coords: &Coords) -> Option<Value> {
        let entries = self.lock();
        entries
            .iter()
            .filter(|((_, stored), _)| stored == name)
            .flat_map(|(_, slot)| slot.iter())
            .find(|entry| entry.coords.is_within(coords))
            .map(|entry| entry.value.clone())
    }

    /// Exact lookup by full key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock()
            .iter()
            .flat_map(|((concept, name), slot)| {
                slot.iter().map(move |e| (concept, name, e))
            })
            .find(|(concept, name, e)| memory_key(concept, name, &e.coords) == key)
            .map(|(_, _, e)| e.value.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry as one JSON object keyed by `concept|name|location`.
    pub fn snapshot(&self) -> Value {
        let entries = self.lock();
        let mut object = Map::new();
        for ((concept, name), slot) in entries.iter() {
            for entry in slot {
                object.insert(memory_key(concept, name, &entry.coords), entry.value.clone());
            }
        }
        Value::Object(object)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<(String, String), Vec<Entry>>> {
        // A poisoned lock still holds a consistent map: every write is a
        // single insert or assignment.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_format() {
        let coords = Coords::from([("y", 1), ("x", 0)]);
        assert_eq!(memory_key("colour", "red", &coords), "colour|red|x0_y1");
        assert_eq!(memory_key("c", "n", &Coords::new()), "c|n|");
    }

    #[test]
    fn test_recollect_by_location_subset() {
        let memory = LocationMemory::new();
        memory.remember("c", "apple", json!("a fruit"), &Coords::from([("x", 0)]));

        let hit = memory.recollect("apple", &Coords::from([("x", 0), ("y", 3)]));
        assert_eq!(hit, Some(json!("a fruit")));
        assert_eq!(memory.recollect("apple", &Coords::from([("x", 1)])), None);
        assert_eq!(memory.recollect("pear", &Coords::from([("x", 0)])), None);
    }

    #[test]
    fn test_locationless_entry_visible_everywhere() {
        let memory = LocationMemory::new();
        memory.remember("c", "k", json!(1), &Coords::new());
        assert_eq!(memory.recollect("k", &Coords::from([("z", 9)])), Some(json!(1)));
    }

    #[test]
    fn test_snapshot_and_overwrite() {
        let memory = LocationMemory::new();
        let key = memory.remember("c", "k", json!(1), &Coords::new());
        memory.remember("c", "k", json!(2), &Coords::new());
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.get(&key), Some(json!(2)));
        assert_eq!(memory.snapshot(), json!({"c|k|": 2}));
    }

    #[test]
    fn test_underscored_axes_match_whole_names() {
        let memory = LocationMemory::new();
        let at = Coords::from([("red_fruit", 0)]);
        memory.remember("c", "apple", json!("crisp"), &at);
        assert_eq!(memory.recollect("apple", &at), Some(json!("crisp")));
        assert_eq!(
            memory.recollect("apple", &Coords::from([("red_fruit", 0), ("is_red", 2)])),
            Some(json!("crisp"))
        );
        assert_eq!(memory.recollect("apple", &Coords::from([("red", 0)])), None);
    }

    #[test]
    fn test_tag_lookalikes_stay_apart() {
        // both render as location `x10`
        let memory = LocationMemory::new();
        memory.remember("c", "k", json!("x1 at 0"), &Coords::from([("x1", 0)]));
        memory.remember("c", "k", json!("x at 10"), &Coords::from([("x", 10)]));
        assert_eq!(memory.len(), 2);
        assert_eq!(
            memory.recollect("k", &Coords::from([("x", 10)])),
            Some(json!("x at 10"))
        );
        assert_eq!(
            memory.recollect("k", &Coords::from([("x1", 0)])),
            Some(json!("x1 at 0"))
        );
    }
}
