//! # Veristore Crypto
//!
//! Concrete cryptographic providers for veristore: Ed25519 key pairs, a
//! system-RNG noncer, and an in-memory verification key store. All of them
//! implement the capability traits defined in [`veristore_core`].

pub mod ed25519;
pub mod keystore;
pub mod noncer;

pub use ed25519::{Ed25519Keypair, Ed25519PublicKey, Ed25519Verifier};
pub use keystore::InMemoryKeyStore;
pub use noncer::SystemNoncer;
