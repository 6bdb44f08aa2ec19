//! Abstract document store trait.
//!
//! This is the only wire-level boundary of the core: table setup plus
//! per-document CRUD with equality filtering and field projection. All
//! calls are synchronous; the calling thread blocks until the store
//! responds.

use crate::entity::EntityId;
use crate::error::StoreError;
use crate::value::Value;

/// Table-oriented document store.
///
/// Documents are [`Value`] mappings. On insert the store assigns an id and
/// injects its string form under the `"id"` key of the stored document.
/// Writes are atomic per document; nothing here spans multiple documents.
pub trait DocumentStore: Send + Sync {
    /// Creates the logical database. Idempotent.
    fn create_database(&self, name: &str) -> Result<(), StoreError>;

    /// Creates a table. Idempotent.
    fn create_table(&self, table: &str) -> Result<(), StoreError>;

    /// Inserts a document, returning the store-assigned id.
    fn insert(&self, table: &str, document: Value) -> Result<EntityId, StoreError>;

    /// Returns every document whose top-level `field` equals `equals`,
    /// in insertion order.
    fn filter(&self, table: &str, field: &str, equals: &Value) -> Result<Vec<Value>, StoreError>;

    /// Returns every document projected to the given top-level fields,
    /// in insertion order. Absent fields are omitted from the projection.
    fn pluck(&self, table: &str, fields: &[&str]) -> Result<Vec<Value>, StoreError>;

    /// Fetches a document by id. `Ok(None)` when absent.
    fn get(&self, table: &str, id: EntityId) -> Result<Option<Value>, StoreError>;

    /// Applies `patch` to the document as a shallow top-level merge:
    /// each top-level key of the patch replaces the stored key wholesale.
    fn update(&self, table: &str, id: EntityId, patch: Value) -> Result<(), StoreError>;

    /// Removes a document permanently. `DocumentNotFound` when absent.
    fn delete(&self, table: &str, id: EntityId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test: the trait must stay object-safe, components hold
    // it as Arc<dyn DocumentStore>.
    fn _assert_object_safe(_: &dyn DocumentStore) {}
}
