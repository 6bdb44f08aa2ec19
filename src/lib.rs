//! # roster - dynamic host/group inventory core
//!
//! Roster maintains a small set of named entities (hosts and groups), each
//! carrying an opaque identifier and an arbitrary nested variable payload,
//! persisted in a document store and re-exported as structured JSON for
//! provisioning tooling.
//!
//! ## Core Concepts
//!
//! - **Reference**: a name and/or id addressing one entity; the id is
//!   authoritative when both are present
//! - **Resolver**: maps a reference to a definitive [`EntityId`]
//! - **Value**: an ordered JSON-shaped document holding inventory variables
//! - **Projection**: shapes raw stored documents into the nested JSON view
//!   consumers expect
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use roster::{MemoryStore, Reference, Session, Value};
//!
//! let session = Session::open_default(Arc::new(MemoryStore::new()))?;
//!
//! let hosts = session.hosts();
//! hosts.add("localhost")?;
//!
//! let mut vars = Value::map();
//! vars.insert("ansible_host", Value::from("127.0.0.1"));
//! hosts.update(&Reference::from("localhost"), vars)?;
//!
//! let vars = hosts.vars(&Reference::from("localhost"))?;
//! println!("{}", vars.to_json_pretty());
//! # Ok::<(), roster::InventoryError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod entity;
pub mod error;
pub mod groups;
pub mod hosts;
pub mod projection;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod value;

// Re-export primary types at crate root for convenience
pub use entity::{EntityId, EntityKind, GroupData, Reference};
pub use error::{InventoryError, InventoryResult, StoreError};
pub use groups::GroupStore;
pub use hosts::HostStore;
pub use projection::{project_host_vars, InventoryProjector};
pub use resolver::EntityResolver;
pub use session::{Session, StoreConfig};
pub use storage::{DocumentStore, MemoryStore};
pub use value::Value;
