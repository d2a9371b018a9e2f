//! Nonce generation.

use rand::rngs::OsRng;
use rand::RngCore as _;

use veristore_core::error::CryptoError;
use veristore_core::{encode, Code, Noncer};

/// 128-bit nonces from the system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNoncer;

impl Noncer for SystemNoncer {
    fn generate(&self) -> Result<String, CryptoError> {
        let mut raw = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut raw)
            .map_err(|e| CryptoError::Entropy(e.to_string()))?;
        encode(Code::Nonce128, &raw).map_err(|e| CryptoError::Entropy(e.to_string()))
    }
}
