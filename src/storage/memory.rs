//! In-memory document store backend.
//!
//! Thread-safe reference implementation of [`DocumentStore`], intended for
//! embedded usage and tests. Tables keep documents in insertion order so
//! listing and projection are deterministic.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::entity::EntityId;
use crate::error::StoreError;
use crate::storage::traits::DocumentStore;
use crate::value::Value;

fn lock_err(context: &'static str) -> StoreError {
    StoreError::BackendError(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct State {
    databases: Vec<String>,
    tables: HashMap<String, Vec<(EntityId, Value)>>,
}

impl State {
    fn table(&self, name: &str) -> Result<&Vec<(EntityId, Value)>, StoreError> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Vec<(EntityId, Value)>, StoreError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }
}

/// Thread-safe in-memory document store.
///
/// A single `RwLock` guards all tables, so writers are serialized; in
/// particular, resolve-then-insert sequences issued under one lock holder
/// cannot interleave with another writer mid-document.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a table. Test/diagnostic helper.
    pub fn len(&self, table: &str) -> Result<usize, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("len"))?;
        Ok(state.table(table)?.len())
    }
}

impl DocumentStore for MemoryStore {
    fn create_database(&self, name: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("create_database"))?;
        if !state.databases.iter().any(|db| db == name) {
            state.databases.push(name.to_string());
        }
        Ok(())
    }

    fn create_table(&self, table: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("create_table"))?;
        state.tables.entry(table.to_string()).or_default();
        Ok(())
    }

    fn insert(&self, table: &str, mut document: Value) -> Result<EntityId, StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("insert"))?;
        let rows = state.table_mut(table)?;

        let id = EntityId::new();
        document.insert("id", Value::from(id.to_string()));
        rows.push((id, document));
        Ok(id)
    }

    fn filter(&self, table: &str, field: &str, equals: &Value) -> Result<Vec<Value>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("filter"))?;
        Ok(state
            .table(table)?
            .iter()
            .filter(|(_, doc)| doc.get(field) == Some(equals))
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    fn pluck(&self, table: &str, fields: &[&str]) -> Result<Vec<Value>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("pluck"))?;
        Ok(state
            .table(table)?
            .iter()
            .map(|(_, doc)| {
                let mut projected = Value::map();
                for field in fields {
                    if let Some(v) = doc.get(field) {
                        projected.insert(*field, v.clone());
                    }
                }
                projected
            })
            .collect())
    }

    fn get(&self, table: &str, id: EntityId) -> Result<Option<Value>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("get"))?;
        Ok(state
            .table(table)?
            .iter()
            .find(|(doc_id, _)| *doc_id == id)
            .map(|(_, doc)| doc.clone()))
    }

    fn update(&self, table: &str, id: EntityId, patch: Value) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("update"))?;
        let rows = state.table_mut(table)?;
        let Some((_, doc)) = rows.iter_mut().find(|(doc_id, _)| *doc_id == id) else {
            return Err(StoreError::DocumentNotFound(id));
        };

        if let Value::Mapping(entries) = patch {
            for (key, value) in entries {
                // The id field is store-owned and never patched.
                if key != "id" {
                    doc.insert(key, value);
                }
            }
        }
        Ok(())
    }

    fn delete(&self, table: &str, id: EntityId) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("delete"))?;
        let rows = state.table_mut(table)?;
        let Some(idx) = rows.iter().position(|(doc_id, _)| *doc_id == id) else {
            return Err(StoreError::DocumentNotFound(id));
        };
        rows.remove(idx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_table(table: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.create_database("inventory").unwrap();
        store.create_table(table).unwrap();
        store
    }

    fn named_doc(name: &str) -> Value {
        let mut doc = Value::map();
        doc.insert("name", Value::from(name));
        doc
    }

    #[test]
    fn test_setup_is_idempotent() {
        let store = MemoryStore::new();
        store.create_database("inventory").unwrap();
        store.create_database("inventory").unwrap();
        store.create_table("hosts").unwrap();

        let id = store.insert("hosts", named_doc("a")).unwrap();
        store.create_table("hosts").unwrap();
        // Re-creating the table must not drop existing rows.
        assert!(store.get("hosts", id).unwrap().is_some());
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let store = MemoryStore::new();
        let err = store.filter("hosts", "name", &Value::from("x")).unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(_)));
    }

    #[test]
    fn test_insert_assigns_and_injects_id() {
        let store = store_with_table("hosts");
        let id = store.insert("hosts", named_doc("localhost")).unwrap();

        let doc = store.get("hosts", id).unwrap().unwrap();
        assert_eq!(doc.get("id").and_then(Value::as_str), Some(id.to_string().as_str()));
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("localhost"));
    }

    #[test]
    fn test_get_absent_is_none() {
        let store = store_with_table("hosts");
        assert!(store.get("hosts", EntityId::new()).unwrap().is_none());
    }

    #[test]
    fn test_filter_matches_in_insertion_order() {
        let store = store_with_table("hosts");
        store.insert("hosts", named_doc("a")).unwrap();
        store.insert("hosts", named_doc("b")).unwrap();
        store.insert("hosts", named_doc("a")).unwrap();

        let matches = store.filter("hosts", "name", &Value::from("a")).unwrap();
        assert_eq!(matches.len(), 2);

        let none = store.filter("hosts", "name", &Value::from("zzz")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_pluck_projects_fields() {
        let store = store_with_table("hosts");
        let mut doc = named_doc("a");
        doc.insert("vars", Value::map());
        store.insert("hosts", doc).unwrap();
        store.insert("hosts", named_doc("b")).unwrap();

        let projected = store.pluck("hosts", &["name", "vars"]).unwrap();
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].get("name").and_then(Value::as_str), Some("a"));
        assert!(projected[0].get("id").is_none());
        // The second document has no vars field; the projection omits it.
        assert!(projected[1].get("vars").is_none());
    }

    #[test]
    fn test_update_merges_top_level() {
        let store = store_with_table("hosts");
        let id = store.insert("hosts", named_doc("a")).unwrap();

        let mut vars = Value::map();
        vars.insert("port", Value::from(22));
        let mut patch = Value::map();
        patch.insert("vars", vars);
        store.update("hosts", id, patch).unwrap();

        let doc = store.get("hosts", id).unwrap().unwrap();
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("a"));
        assert_eq!(doc.get("vars").and_then(|v| v.get("port")), Some(&Value::Int(22)));

        // A second patch replaces the sub-document wholesale.
        let mut patch = Value::map();
        patch.insert("vars", Value::map());
        store.update("hosts", id, patch).unwrap();
        let doc = store.get("hosts", id).unwrap().unwrap();
        assert_eq!(doc.get("vars"), Some(&Value::map()));
    }

    #[test]
    fn test_update_cannot_rewrite_id() {
        let store = store_with_table("hosts");
        let id = store.insert("hosts", named_doc("a")).unwrap();

        let mut patch = Value::map();
        patch.insert("id", Value::from("forged"));
        store.update("hosts", id, patch).unwrap();

        let doc = store.get("hosts", id).unwrap().unwrap();
        assert_eq!(doc.get("id").and_then(Value::as_str), Some(id.to_string().as_str()));
    }

    #[test]
    fn test_update_absent_is_not_found() {
        let store = store_with_table("hosts");
        let err = store.update("hosts", EntityId::new(), Value::map()).unwrap_err();
        assert!(matches!(err, StoreError::DocumentNotFound(_)));
    }

    #[test]
    fn test_delete_removes_permanently() {
        let store = store_with_table("hosts");
        let id = store.insert("hosts", named_doc("a")).unwrap();
        store.delete("hosts", id).unwrap();

        assert!(store.get("hosts", id).unwrap().is_none());
        let err = store.delete("hosts", id).unwrap_err();
        assert!(matches!(err, StoreError::DocumentNotFound(_)));
    }

    #[test]
    fn test_len() {
        let store = store_with_table("hosts");
        assert_eq!(store.len("hosts").unwrap(), 0);
        store.insert("hosts", named_doc("a")).unwrap();
        assert_eq!(store.len("hosts").unwrap(), 1);
    }
}
