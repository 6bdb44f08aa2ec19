//! Process-scoped store session.
//!
//! One logical connection to the document store is opened at startup and
//! shared for the process lifetime. `Session` owns that handle explicitly
//! (no module-level singleton) so tests can inject a store double, and
//! runs the idempotent database/table setup at open time.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::entity::EntityKind;
use crate::error::{InventoryResult, StoreError};
use crate::groups::GroupStore;
use crate::hosts::HostStore;
use crate::projection::InventoryProjector;
use crate::storage::DocumentStore;

/// Fixed process-wide store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Network address of the document store.
    pub address: String,
    /// Logical database name.
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8081".to_string(),
            database: "inventory".to_string(),
        }
    }
}

/// Shared store handle with an explicit open/close lifecycle.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn DocumentStore>,
    config: StoreConfig,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Opens a session and runs idempotent setup.
    ///
    /// Database and table creation failures are logged and tolerated (the
    /// objects usually already exist); only store connectivity failures
    /// are fatal, since no further operation is possible without it.
    pub fn open(store: Arc<dyn DocumentStore>, config: StoreConfig) -> InventoryResult<Self> {
        setup_step(store.create_database(&config.database), "create_database")?;
        for kind in [EntityKind::Host, EntityKind::Group] {
            setup_step(store.create_table(kind.table()), kind.table())?;
        }

        debug!(address = %config.address, database = %config.database, "session opened");
        Ok(Self { store, config })
    }

    /// Opens a session with default settings.
    pub fn open_default(store: Arc<dyn DocumentStore>) -> InventoryResult<Self> {
        Self::open(store, StoreConfig::default())
    }

    /// The shared store handle.
    #[must_use]
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }

    /// The settings this session was opened with.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// A host store bound to this session.
    #[must_use]
    pub fn hosts(&self) -> HostStore {
        HostStore::new(self.store())
    }

    /// A group store bound to this session.
    #[must_use]
    pub fn groups(&self) -> GroupStore {
        GroupStore::new(self.store())
    }

    /// A projector bound to this session.
    #[must_use]
    pub fn projector(&self) -> InventoryProjector {
        InventoryProjector::new(self.store())
    }

    /// Closes the session, releasing the store handle.
    pub fn close(self) -> InventoryResult<()> {
        debug!(database = %self.config.database, "session closed");
        Ok(())
    }
}

fn setup_step(result: Result<(), StoreError>, step: &str) -> InventoryResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err @ StoreError::ConnectionError(_)) => Err(err.into()),
        Err(err) => {
            warn!(step, error = %err, "setup step failed; continuing");
            Ok(())
        }
    }
}
