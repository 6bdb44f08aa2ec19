//! Document store boundary.
//!
//! The inventory core talks to its persistent store exclusively through
//! the [`DocumentStore`] trait. The crate ships a thread-safe in-memory
//! backend for embedded use and tests; a production wire adapter lives
//! outside this crate.

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::DocumentStore;
