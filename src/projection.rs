//! Projection of raw stored documents into the external JSON shape.
//!
//! Inventory consumers expect nested JSON: a variable map per host, and a
//! `{hosts, vars, children}` object per group with absent sub-fields
//! defaulted to empty containers. Projection is flat; group variable
//! inheritance, if wanted, is a higher-level concern.

use std::sync::Arc;

use crate::entity::EntityKind;
use crate::error::InventoryResult;
use crate::storage::DocumentStore;
use crate::value::Value;

/// Extracts the `vars` sub-document of a host record.
///
/// Returns an empty mapping when the host has none, matching the "empty
/// object, not an error" contract of the tool boundary.
#[must_use]
pub fn project_host_vars(document: &Value) -> Value {
    match document.get("vars") {
        Some(vars) if !vars.is_null() => vars.clone(),
        _ => Value::map(),
    }
}

/// Bulk listing and group-view shaping over the document store.
#[derive(Clone)]
pub struct InventoryProjector {
    store: Arc<dyn DocumentStore>,
}

impl InventoryProjector {
    /// Creates a projector over the shared document store handle.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Returns the payload document of every entity of a kind, in
    /// insertion order. Entities without a payload contribute an empty
    /// mapping.
    ///
    /// An empty table is an empty sequence, not an error; errors are
    /// reserved for store failures.
    pub fn list_all(&self, kind: EntityKind) -> InventoryResult<Vec<Value>> {
        let field = kind.payload_field();
        let projected = self.store.pluck(kind.table(), &[field])?;
        Ok(projected
            .into_iter()
            .map(|doc| match doc.get(field) {
                Some(payload) if !payload.is_null() => payload.clone(),
                _ => Value::map(),
            })
            .collect())
    }

    /// Assembles the full group membership view: a mapping from group name
    /// to `{hosts: [...], vars: {...}, children: [...]}`, with missing
    /// sub-fields defaulted to empty containers.
    ///
    /// `children` links are not followed, so hierarchy cycles cannot loop
    /// this projection.
    pub fn project_group_membership(&self) -> InventoryResult<Value> {
        let table = EntityKind::Group.table();
        let groups = self.store.pluck(table, &["name", "data"])?;

        let mut view = Value::map();
        for group in groups {
            let Some(name) = group.get("name").and_then(Value::as_str) else {
                // Nameless documents are unaddressable; leave them out of
                // the view rather than inventing a key.
                continue;
            };

            let data = group.get("data");
            let mut shaped = Value::map();
            shaped.insert("hosts", field_or(data, "hosts", Value::Sequence(Vec::new())));
            shaped.insert("vars", field_or(data, "vars", Value::map()));
            shaped.insert(
                "children",
                field_or(data, "children", Value::Sequence(Vec::new())),
            );
            view.insert(name.to_string(), shaped);
        }
        Ok(view)
    }
}

fn field_or(data: Option<&Value>, field: &str, default: Value) -> Value {
    match data.and_then(|d| d.get(field)) {
        Some(v) if !v.is_null() => v.clone(),
        _ => default,
    }
}
