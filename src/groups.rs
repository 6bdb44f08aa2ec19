//! Group CRUD operations.
//!
//! Mirrors [`HostStore`](crate::hosts::HostStore) in shape. Groups carry
//! their whole payload (`hosts`, `vars`, `children`) in a `data`
//! sub-document supplied at creation; the observed contract exposes no
//! group update.

use std::sync::Arc;

use crate::entity::{EntityKind, GroupData, Reference};
use crate::error::{InventoryError, InventoryResult, StoreError};
use crate::resolver::EntityResolver;
use crate::storage::DocumentStore;
use crate::value::Value;

/// CRUD for group entities.
#[derive(Clone)]
pub struct GroupStore {
    store: Arc<dyn DocumentStore>,
    resolver: EntityResolver,
}

impl GroupStore {
    /// Creates a group store over the shared document store handle.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let resolver = EntityResolver::new(EntityKind::Group, store.clone());
        Self { store, resolver }
    }

    /// The resolver backing this store.
    #[must_use]
    pub const fn resolver(&self) -> &EntityResolver {
        &self.resolver
    }

    /// Creates a new group, optionally with an initial payload.
    ///
    /// Host and child-group names inside the payload are not checked
    /// against existing entities; the hierarchy is unvalidated by design.
    pub fn add(&self, name: &str, data: Option<&GroupData>) -> InventoryResult<()> {
        if name.is_empty() {
            return Err(InventoryError::MissingName {
                kind: EntityKind::Group,
            });
        }

        match self.resolver.resolve(&Reference::from(name)) {
            Ok(_) => {
                return Err(InventoryError::AlreadyExists {
                    kind: EntityKind::Group,
                    name: name.to_string(),
                })
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        let mut doc = Value::map();
        doc.insert("name", Value::from(name));
        if let Some(data) = data {
            doc.insert("data", data.to_value());
        }
        self.store.insert(EntityKind::Group.table(), doc)?;
        Ok(())
    }

    /// Deletes a group permanently.
    ///
    /// Hosts listed in the group's `hosts` field are not removed and
    /// parent groups keep the deleted name in their `children` lists;
    /// referential cleanup is the caller's responsibility.
    pub fn delete(&self, reference: &Reference) -> InventoryResult<()> {
        let id = self.resolver.resolve(reference)?;
        self.store
            .delete(EntityKind::Group.table(), id)
            .map_err(|err| match err {
                StoreError::DocumentNotFound(_) => InventoryError::NotFound {
                    kind: EntityKind::Group,
                    reference: reference.to_string(),
                },
                other => InventoryError::Store(other),
            })
    }

    /// Fetches the raw stored document for a group.
    pub fn get(&self, reference: &Reference) -> InventoryResult<Value> {
        let id = self.resolver.resolve(reference)?;
        self.store
            .get(EntityKind::Group.table(), id)?
            .ok_or_else(|| InventoryError::NotFound {
                kind: EntityKind::Group,
                reference: reference.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn group_store() -> GroupStore {
        let store = Arc::new(MemoryStore::new());
        store.create_table("groups").unwrap();
        GroupStore::new(store)
    }

    fn web_data() -> GroupData {
        let mut vars = Value::map();
        vars.insert("port", Value::from(80));
        GroupData {
            hosts: vec!["localhost".to_string()],
            vars,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_add_with_data() {
        let groups = group_store();
        groups.add("web", Some(&web_data())).unwrap();

        let doc = groups.get(&Reference::from("web")).unwrap();
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("web"));
        let data = doc.get("data").unwrap();
        assert_eq!(
            data.get("hosts").and_then(Value::as_sequence),
            Some([Value::from("localhost")].as_slice())
        );
        assert_eq!(data.get("vars").and_then(|v| v.get("port")), Some(&Value::Int(80)));
    }

    #[test]
    fn test_add_without_data() {
        let groups = group_store();
        groups.add("empty", None).unwrap();

        let doc = groups.get(&Reference::from("empty")).unwrap();
        assert!(doc.get("data").is_none());
    }

    #[test]
    fn test_add_empty_name_fails() {
        let groups = group_store();
        let err = groups.add("", None).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::MissingName {
                kind: EntityKind::Group
            }
        ));
    }

    #[test]
    fn test_add_twice_fails() {
        let groups = group_store();
        groups.add("web", None).unwrap();
        let err = groups.add("web", Some(&web_data())).unwrap_err();
        assert!(matches!(err, InventoryError::AlreadyExists { .. }));
    }

    #[test]
    fn test_delete_then_resolve_fails() {
        let groups = group_store();
        groups.add("web", None).unwrap();
        groups.delete(&Reference::from("web")).unwrap();

        let err = groups.get(&Reference::from("web")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_absent_is_not_found() {
        let groups = group_store();
        let err = groups.delete(&Reference::from("ghost")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cyclic_children_are_representable() {
        let groups = group_store();
        let a = GroupData {
            children: vec!["b".to_string()],
            ..GroupData::default()
        };
        let b = GroupData {
            children: vec!["a".to_string()],
            ..GroupData::default()
        };
        groups.add("a", Some(&a)).unwrap();
        groups.add("b", Some(&b)).unwrap();

        let doc = groups.get(&Reference::from("a")).unwrap();
        assert_eq!(
            doc.get("data").and_then(|d| d.get("children")),
            Some(&Value::Sequence(vec![Value::from("b")]))
        );
    }
}
