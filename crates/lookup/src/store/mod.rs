//! Storage collaborator for the row engine.
//!
//! The engine never talks to a global client. Every operation receives an
//! explicit [`Transaction`] that covers both the column reads and the row
//! writes of one request, so the canonical form computed from the columns
//! cannot be invalidated by a concurrent column edit before it is written.
//!
//! [`MemoryStore`] is the bundled implementation: serializable transactions
//! over an in-memory database, with optional JSON file persistence.

mod memory;
mod persistence;
mod transaction;

pub use memory::{Database, MemoryStore, MemoryTransaction};
pub use transaction::{NewRow, OnConflict, Storage, Transaction};
