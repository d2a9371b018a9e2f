//! # Veristore
//!
//! Tamper-evident versioned record storage. Every version of a record is
//! named by the hash of its own content, chained to its predecessor, and
//! optionally signed; every read re-verifies what it returns.
//!
//! ## Key Concepts
//!
//! - **Self-address**: a version's id is the Blake3 digest of its canonical
//!   bytes, computed with the id field held by a placeholder.
//! - **Prefix**: the self-address of version 0, constant across the chain.
//!   It is the stable name of the record.
//! - **Chain**: each version carries its predecessor's id and a sequence
//!   number; history is verifiable end to end.
//! - **Signing**: signed records stamp the signer's identity before
//!   addressing and sign after, so the signature covers the final id.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use serde::{Deserialize, Serialize};
//! use veristore::core::{Recordable, SystemClock, VersionMeta};
//! use veristore::crypto::SystemNoncer;
//! use veristore::store::SqliteStore;
//! use veristore::{Repository, RepositoryConfig};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Note {
//!     #[serde(flatten)]
//!     meta: VersionMeta,
//!     body: String,
//! }
//!
//! impl Recordable for Note {
//!     const TABLE: &'static str = "notes";
//!     const COLUMNS: &'static [&'static str] = &["body"];
//!
//!     fn meta(&self) -> &VersionMeta {
//!         &self.meta
//!     }
//!
//!     fn meta_mut(&mut self) -> &mut VersionMeta {
//!         &mut self.meta
//!     }
//! }
//!
//! async fn example() {
//!     let store = Arc::new(SqliteStore::open("notes.db").unwrap());
//!     let repo: Repository<_, Note> = Repository::new(
//!         store,
//!         Arc::new(SystemNoncer),
//!         Arc::new(SystemClock),
//!         RepositoryConfig::default(),
//!     );
//!
//!     let mut note = Note {
//!         body: "first draft".into(),
//!         ..Note::default()
//!     };
//!     repo.create_version(&mut note).await.unwrap();
//!
//!     note.body = "second draft".into();
//!     repo.create_version(&mut note).await.unwrap();
//!
//!     let history = repo.history(&note.meta.prefix).await.unwrap();
//!     assert_eq!(history.len(), 2);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `veristore::core` - Record model, canonicalization, and primitives
//! - `veristore::crypto` - Ed25519 keys, noncer, key store
//! - `veristore::store` - Storage abstraction, SQLite and in-memory

pub mod error;
pub mod repository;

// Re-export component crates
pub use veristore_core as core;
pub use veristore_crypto as crypto;
pub use veristore_store as store;

// Re-export main types for convenience
pub use error::{RepositoryError, Result};
pub use repository::{Repository, RepositoryConfig, SignableRepository};

// Re-export commonly used component types
pub use veristore_core::{
    Clock, Noncer, Recordable, Signable, SigningKey, SigningMeta, SystemClock, Timestamp,
    VerificationKey, VerificationKeyStore, VersionMeta,
};
pub use veristore_crypto::{Ed25519Keypair, InMemoryKeyStore, SystemNoncer};
pub use veristore_store::{
    Condition, Direction, MemoryStore, OrderBy, RecordRow, Scalar, SqliteStore, Store,
};
