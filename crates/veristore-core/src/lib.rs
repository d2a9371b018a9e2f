//! # Veristore Core
//!
//! Pure primitives for veristore: versioned records, canonical
//! serialization, self-addressing, chain-root prefixes, version chaining,
//! and signing.
//!
//! This crate contains no I/O and no storage. It is pure computation over
//! record content.
//!
//! ## Key Types
//!
//! - [`VersionMeta`] - Identity and lineage fields embedded in every record
//! - [`Recordable`] / [`Signable`] - The record capability traits
//! - [`Code`] - Self-describing text encoding for cryptographic artifacts
//! - [`Timestamp`] - Fixed-precision UTC instants
//!
//! ## Canonicalization
//!
//! Hashing and signing both operate on a fixed-order compact JSON form.
//! See [`canonical`] module.

pub mod address;
pub mod canonical;
pub mod chain;
pub mod encoding;
pub mod error;
pub mod prefix;
pub mod record;
pub mod signing;
pub mod timestamp;

pub use address::{compute_address, self_address, verify_address};
pub use canonical::{canonical_json, AddressMask};
pub use chain::{advance, verify_genesis, verify_link};
pub use encoding::{decode, encode, Code, ADDRESS_PLACEHOLDER};
pub use error::{ChainError, CryptoError, EncodingError, IntegrityError, SignatureError};
pub use prefix::{apply_prefix, compute_prefix, verify_prefix};
pub use record::{Recordable, Signable, SigningMeta, VersionMeta};
pub use signing::{
    sign_record, signed_message, verify_signature, Noncer, SigningKey, VerificationKey,
    VerificationKeyStore, Verifier,
};
pub use timestamp::{Clock, SystemClock, Timestamp};
