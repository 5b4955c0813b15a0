//! The mutable working store served by the resource router.
//!
//! Semantics follow json-server: records are JSON objects keyed by a numeric
//! `id`, creates assign `max(id) + 1`, PUT replaces the whole record while
//! preserving `id`, PATCH merges fields shallowly, and lookups on unknown ids
//! return nothing (the handlers render that as `404 {}`).

use std::collections::HashMap;

use serde_json::{Map, Value};

/// A deep copy of the fixture that the CRUD handlers read and write.
///
/// Owned behind `Arc<RwLock<Store>>` by the service and replaced wholesale by
/// the reset middleware before every non-root request.
#[derive(Debug, Clone, Default)]
pub struct Store {
    collections: HashMap<String, Vec<Value>>,
}

fn record_id(record: &Value) -> Option<u64> {
    record.get("id")?.as_u64()
}

impl Store {
    #[must_use]
    pub fn new(collections: HashMap<String, Vec<Value>>) -> Self {
        Self { collections }
    }

    /// All records of a collection, in insertion order. Unknown collections
    /// yield an empty slice; the fixture loader guarantees the six known ones.
    #[must_use]
    pub fn list(&self, name: &str) -> &[Value] {
        self.collections.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn get(&self, name: &str, id: u64) -> Option<&Value> {
        self.list(name).iter().find(|r| record_id(r) == Some(id))
    }

    /// Append a new record, assigning the next free numeric id.
    pub fn create(&mut self, name: &str, mut record: Map<String, Value>) -> Value {
        let id = self.next_id(name);
        record.insert("id".to_string(), Value::from(id));
        let record = Value::Object(record);
        self.collections
            .entry(name.to_string())
            .or_default()
            .push(record.clone());
        record
    }

    /// Replace an existing record entirely, keeping its id.
    pub fn replace(&mut self, name: &str, id: u64, mut record: Map<String, Value>) -> Option<Value> {
        record.insert("id".to_string(), Value::from(id));
        let record = Value::Object(record);
        let slot = self
            .collections
            .get_mut(name)?
            .iter_mut()
            .find(|r| record_id(r) == Some(id))?;
        *slot = record.clone();
        Some(record)
    }

    /// Shallow-merge fields into an existing record; the id is not writable.
    pub fn merge(&mut self, name: &str, id: u64, patch: Map<String, Value>) -> Option<Value> {
        let slot = self
            .collections
            .get_mut(name)?
            .iter_mut()
            .find(|r| record_id(r) == Some(id))?;
        if let Some(fields) = slot.as_object_mut() {
            for (key, value) in patch {
                if key != "id" {
                    fields.insert(key, value);
                }
            }
        }
        Some(slot.clone())
    }

    /// Remove a record, returning it if it existed.
    pub fn remove(&mut self, name: &str, id: u64) -> Option<Value> {
        let records = self.collections.get_mut(name)?;
        let pos = records.iter().position(|r| record_id(r) == Some(id))?;
        Some(records.remove(pos))
    }

    fn next_id(&self, name: &str) -> u64 {
        self.list(name)
            .iter()
            .filter_map(record_id)
            .max()
            .map_or(1, |max| max + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> Store {
        let mut collections = HashMap::new();
        collections.insert(
            "posts".to_string(),
            vec![
                json!({ "userId": 1, "id": 1, "title": "first" }),
                json!({ "userId": 2, "id": 5, "title": "second" }),
            ],
        );
        Store::new(collections)
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn get_finds_record_by_id() {
        let store = store();
        assert_eq!(store.get("posts", 5).unwrap()["title"], "second");
        assert!(store.get("posts", 7).is_none());
        assert!(store.get("nope", 1).is_none());
    }

    #[test]
    fn create_assigns_next_id() {
        let mut store = store();
        let created = store.create("posts", object(json!({ "title": "third" })));
        assert_eq!(created["id"], 6);
        assert_eq!(store.list("posts").len(), 3);
    }

    #[test]
    fn create_ignores_client_supplied_id() {
        let mut store = store();
        let created = store.create("posts", object(json!({ "id": 99, "title": "x" })));
        assert_eq!(created["id"], 6);
    }

    #[test]
    fn replace_keeps_id_and_drops_old_fields() {
        let mut store = store();
        let replaced = store
            .replace("posts", 1, object(json!({ "title": "new" })))
            .unwrap();
        assert_eq!(replaced["id"], 1);
        assert_eq!(replaced["title"], "new");
        assert!(store.get("posts", 1).unwrap().get("userId").is_none());
    }

    #[test]
    fn replace_missing_returns_none() {
        let mut store = store();
        assert!(store.replace("posts", 42, Map::new()).is_none());
    }

    #[test]
    fn merge_patches_fields_shallowly() {
        let mut store = store();
        let merged = store
            .merge("posts", 1, object(json!({ "title": "patched" })))
            .unwrap();
        assert_eq!(merged["title"], "patched");
        assert_eq!(merged["userId"], 1);
    }

    #[test]
    fn merge_cannot_rewrite_id() {
        let mut store = store();
        let merged = store
            .merge("posts", 1, object(json!({ "id": 9, "title": "t" })))
            .unwrap();
        assert_eq!(merged["id"], 1);
    }

    #[test]
    fn remove_returns_the_record() {
        let mut store = store();
        let removed = store.remove("posts", 5).unwrap();
        assert_eq!(removed["title"], "second");
        assert_eq!(store.list("posts").len(), 1);
        assert!(store.remove("posts", 5).is_none());
    }

    #[test]
    fn next_id_starts_at_one_for_empty_collections() {
        let mut store = Store::default();
        let created = store.create("todos", Map::new());
        assert_eq!(created["id"], 1);
    }
}
