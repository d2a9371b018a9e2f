//! Error types for the veristore core.
//!
//! One enum per failure domain, so callers can tell a broken address from a
//! broken signature from a broken chain without string matching.

use thiserror::Error;

/// Failures while producing or consuming the canonical text forms.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("serialization failed: {0}")]
    Serialize(String),

    #[error("canonical form requires a JSON object, got {0}")]
    NotAnObject(String),

    #[error("declared column {0:?} missing from serialized record")]
    MissingColumn(&'static str),

    #[error("serialized field {0:?} is not a declared column")]
    UndeclaredColumn(String),

    #[error("unknown type code in token {0:?}")]
    UnknownCode(String),

    #[error("token length mismatch: expected {expected}, got {got}")]
    TokenLength { expected: usize, got: usize },

    #[error("invalid base64url payload: {0}")]
    Base64(String),

    #[error("raw material length mismatch: expected {expected}, got {got}")]
    RawLength { expected: usize, got: usize },

    #[error("invalid timestamp {0:?}")]
    Timestamp(String),
}

/// Failures inside a cryptographic primitive or its key material.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("entropy source failed: {0}")]
    Entropy(String),

    #[error("invalid key material: {0}")]
    InvalidKey(String),

    #[error("signing failed: {0}")]
    Signing(String),
}

/// A record's self-address or prefix does not match its content.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("record has no address")]
    MissingAddress,

    #[error("self-address mismatch: stored {stored}, computed {computed}")]
    AddressMismatch { stored: String, computed: String },

    #[error("prefix mismatch: stored {stored}, computed {computed}")]
    PrefixMismatch { stored: String, computed: String },

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// A record's signature is absent, unresolvable, or cryptographically wrong.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("record is not signed")]
    Unsigned,

    #[error("no verification key registered for identity {0:?}")]
    KeyNotFound(String),

    #[error("signature verification failed")]
    Invalid,

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// The sequence/backlink bookkeeping between versions is violated.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("sequence number would overflow")]
    SequenceOverflow,

    #[error("version 0 must not carry a backlink")]
    UnexpectedBacklink,

    #[error("expected sequence {expected}, got {got}")]
    SequenceGap { expected: u64, got: u64 },

    #[error("backlink mismatch at sequence {seq}: expected {expected:?}, got {got:?}")]
    BrokenBacklink {
        seq: u64,
        expected: Option<String>,
        got: Option<String>,
    },

    #[error("prefix changed at sequence {seq}")]
    PrefixChanged { seq: u64 },
}
