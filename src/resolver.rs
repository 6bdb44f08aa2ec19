//! Name/id resolution.
//!
//! Callers address entities by name or id interchangeably. The resolver
//! turns a [`Reference`] into a definitive [`EntityId`]: ids pass through
//! untouched, names are looked up in the store. One implementation serves
//! both entity kinds, parameterized by [`EntityKind`].

use std::sync::Arc;

use crate::entity::{EntityId, EntityKind, Reference};
use crate::error::{InventoryError, InventoryResult, StoreError};
use crate::storage::DocumentStore;
use crate::value::Value;

/// Resolves references against one entity table.
#[derive(Clone)]
pub struct EntityResolver {
    kind: EntityKind,
    store: Arc<dyn DocumentStore>,
}

impl EntityResolver {
    /// Creates a resolver for the given kind.
    #[must_use]
    pub fn new(kind: EntityKind, store: Arc<dyn DocumentStore>) -> Self {
        Self { kind, store }
    }

    /// The kind this resolver serves.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Resolves a reference to a definitive id.
    ///
    /// A reference carrying an id returns it unchanged without touching
    /// the store; the id is trusted and a stale one surfaces as `NotFound`
    /// at the fetch that follows. A name is matched by equality against the
    /// stored `name` field; zero matches is `NotFound`. Name uniqueness is
    /// assumed rather than re-verified, so should the invariant ever be
    /// violated the first match wins.
    pub fn resolve(&self, reference: &Reference) -> InventoryResult<EntityId> {
        if let Some(id) = reference.id() {
            return Ok(id);
        }
        let Some(name) = reference.name() else {
            return Err(InventoryError::InvalidReference);
        };

        let matches = self
            .store
            .filter(self.kind.table(), "name", &Value::from(name))?;
        let first = matches
            .first()
            .ok_or_else(|| InventoryError::NotFound {
                kind: self.kind,
                reference: name.to_string(),
            })?;

        let id = first
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                StoreError::SerializationError(format!(
                    "{} document for {name} has no id field",
                    self.kind
                ))
            })?;
        EntityId::parse(id).map_err(|e| {
            InventoryError::Store(StoreError::SerializationError(format!(
                "malformed id in {} document for {name}: {e}",
                self.kind
            )))
        })
    }
}
