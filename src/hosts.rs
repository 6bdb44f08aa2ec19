//! Host CRUD operations.
//!
//! Layered on [`EntityResolver`]: every operation validates its reference,
//! resolves it to an id when needed, then performs a single store round
//! trip. Variables are attached after creation via [`HostStore::update`],
//! which replaces the `vars` sub-document wholesale.

use std::sync::Arc;

use crate::entity::{EntityKind, Reference};
use crate::error::{InventoryError, InventoryResult, StoreError};
use crate::projection::project_host_vars;
use crate::resolver::EntityResolver;
use crate::storage::DocumentStore;
use crate::value::Value;

/// CRUD for host entities.
#[derive(Clone)]
pub struct HostStore {
    store: Arc<dyn DocumentStore>,
    resolver: EntityResolver,
}

impl HostStore {
    /// Creates a host store over the shared document store handle.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let resolver = EntityResolver::new(EntityKind::Host, store.clone());
        Self { store, resolver }
    }

    /// The resolver backing this store.
    #[must_use]
    pub const fn resolver(&self) -> &EntityResolver {
        &self.resolver
    }

    /// Creates a new host with the given name and no variables.
    ///
    /// The store assigns the id; it is retrievable by a subsequent name
    /// lookup. The name must not already resolve to a host. The
    /// availability check and the insert are separate round trips, so two
    /// racing adds of one name can both pass against a backend that does
    /// not serialize writers.
    pub fn add(&self, name: &str) -> InventoryResult<()> {
        if name.is_empty() {
            return Err(InventoryError::MissingName {
                kind: EntityKind::Host,
            });
        }

        match self.resolver.resolve(&Reference::from(name)) {
            Ok(_) => {
                return Err(InventoryError::AlreadyExists {
                    kind: EntityKind::Host,
                    name: name.to_string(),
                })
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        let mut doc = Value::map();
        doc.insert("name", Value::from(name));
        self.store.insert(EntityKind::Host.table(), doc)?;
        Ok(())
    }

    /// Replaces the host's variable document.
    ///
    /// No validation of the payload's internal shape is performed.
    pub fn update(&self, reference: &Reference, vars: Value) -> InventoryResult<()> {
        let id = self.resolver.resolve(reference)?;

        let mut patch = Value::map();
        patch.insert("vars", vars);
        self.store
            .update(EntityKind::Host.table(), id, patch)
            .map_err(|err| map_absent(err, reference))
    }

    /// Deletes a host permanently.
    ///
    /// Groups listing the host in their `hosts` field are not touched;
    /// referential cleanup is the caller's responsibility.
    pub fn delete(&self, reference: &Reference) -> InventoryResult<()> {
        let id = self.resolver.resolve(reference)?;
        self.store
            .delete(EntityKind::Host.table(), id)
            .map_err(|err| map_absent(err, reference))
    }

    /// Fetches the raw stored document for a host.
    pub fn get(&self, reference: &Reference) -> InventoryResult<Value> {
        let id = self.resolver.resolve(reference)?;
        self.store
            .get(EntityKind::Host.table(), id)?
            .ok_or_else(|| InventoryError::NotFound {
                kind: EntityKind::Host,
                reference: reference.to_string(),
            })
    }

    /// Returns the host's variable document, empty when none was set.
    ///
    /// This is the "variables for a single host" contract consumed by
    /// provisioning tooling.
    pub fn vars(&self, reference: &Reference) -> InventoryResult<Value> {
        Ok(project_host_vars(&self.get(reference)?))
    }

}

fn map_absent(err: StoreError, reference: &Reference) -> InventoryError {
    match err {
        StoreError::DocumentNotFound(_) => InventoryError::NotFound {
            kind: EntityKind::Host,
            reference: reference.to_string(),
        },
        other => InventoryError::Store(other),
    }
}
