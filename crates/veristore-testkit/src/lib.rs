//! # Veristore Testkit
//!
//! Testing utilities for veristore.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: pinned canonical bodies and identifiers for the
//!   reference chain, for cross-implementation verification
//! - **Fixtures**: deterministic noncer and clock, plus the sample record
//!   shapes the vectors are defined over
//!
//! ## Golden Vectors
//!
//! ```rust
//! use veristore_testkit::vectors::verify_unsigned_vectors;
//!
//! verify_unsigned_vectors().unwrap();
//! ```
//!
//! ## Fixtures
//!
//! ```rust
//! use veristore_testkit::fixtures::{FixedClock, FixedNoncer, PlainRecord};
//!
//! let noncer = FixedNoncer::default();
//! let clock = FixedClock::at_epoch();
//! let record = PlainRecord::sample();
//! ```

pub mod fixtures;
pub mod vectors;

pub use fixtures::{FixedClock, FixedNoncer, PlainRecord, SignedRecord};
pub use vectors::{
    build_unsigned_chain, unsigned_vectors, verify_unsigned_vectors, GoldenVector, FIXED_NONCE,
    GOLDEN_PREFIX, T0, ZERO_SEED_IDENTITY,
};
