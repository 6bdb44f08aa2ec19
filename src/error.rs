//! Error types for the inventory core.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific failure conditions and keeps the control-flow
//! quirks of the original tool (empty results signalled as errors) out
//! of the contract.

use thiserror::Error;

use crate::entity::{EntityId, EntityKind};

/// Errors raised by the document store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named table has not been created.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// No document exists under the given id.
    #[error("Document not found: {0}")]
    DocumentNotFound(EntityId),

    /// The store could not be reached.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Backend failure (lock poisoning, query execution, ...).
    #[error("Store backend error: {0}")]
    BackendError(String),

    /// Document encoding/decoding failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Top-level error type for inventory operations.
///
/// The first four variants are the validation/consistency taxonomy of the
/// resolution layer; `Store` carries an underlying store failure unchanged.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A reference was required but neither name nor id was supplied.
    #[error("reference requires a name or an id")]
    InvalidReference,

    /// Creation was attempted without a name.
    #[error("{kind} creation requires a name")]
    MissingName {
        kind: EntityKind,
    },

    /// Creation was attempted for a name that already resolves.
    #[error("{kind} already exists: {name}")]
    AlreadyExists {
        kind: EntityKind,
        name: String,
    },

    /// Resolution or fetch found no matching entity.
    #[error("{kind} not found: {reference}")]
    NotFound {
        kind: EntityKind,
        reference: String,
    },

    /// The underlying store call failed; propagated unchanged, never swallowed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl InventoryError {
    /// Returns true if this is a not-found condition.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a caller-side validation failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidReference | Self::MissingName { .. } | Self::AlreadyExists { .. }
        )
    }

    /// Returns true if the underlying store failed.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;
