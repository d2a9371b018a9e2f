//! Error types for the repository layer.

use thiserror::Error;

use veristore_core::error::{
    ChainError, CryptoError, EncodingError, IntegrityError, SignatureError,
};
use veristore_store::StoreError;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Anything that can go wrong while producing or reading a version.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("integrity: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("signature: {0}")]
    Signature(#[from] SignatureError),

    #[error("chain: {0}")]
    Chain(#[from] ChainError),

    #[error("encoding: {0}")]
    Encoding(#[from] EncodingError),

    #[error("crypto: {0}")]
    Crypto(#[from] CryptoError),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}
