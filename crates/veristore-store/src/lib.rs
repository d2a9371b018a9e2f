//! # Veristore Store
//!
//! Storage backends for veristore. Records are flattened into
//! [`RecordRow`]s: meta fields become real columns, payload fields become
//! queryable scalars, and the canonical body text is kept verbatim for
//! rehydration and re-verification.
//!
//! Two backends share the [`Store`] trait:
//!
//! - [`SqliteStore`] - the primary backend, rusqlite with bundled SQLite
//! - [`MemoryStore`] - same semantics, no persistence, for testing

pub mod condition;
pub mod error;
pub mod memory;
pub mod row;
pub mod sqlite;
pub mod traits;

pub use condition::{Condition, Direction, OrderBy};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use row::{RecordRow, Scalar};
pub use sqlite::SqliteStore;
pub use traits::Store;
