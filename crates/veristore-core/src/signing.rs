//! Signing and verification over canonical bytes.
//!
//! The signed message is the unmasked canonical form, so the signature
//! covers the finalized `id` (and through it everything the digest covers).
//! Order matters when producing a version: the signing identity is stamped
//! before addressing, the signature is produced after.
//!
//! Key material lives behind traits so callers can bring hardware-backed or
//! in-memory implementations interchangeably.

use std::sync::Arc;

use serde::Serialize;

use crate::canonical::{canonical_json, AddressMask};
use crate::error::{CryptoError, SignatureError};
use crate::record::Signable;

/// Source of per-version salts.
pub trait Noncer: Send + Sync {
    /// Produce a fresh encoded nonce token.
    fn generate(&self) -> Result<String, CryptoError>;
}

/// Checks a signature token against a public key token and a message.
pub trait Verifier: Send + Sync {
    fn verify(&self, signature: &str, public_key: &str, message: &[u8])
        -> Result<(), SignatureError>;
}

/// The public half of a key pair.
pub trait VerificationKey: Send + Sync {
    /// Encoded public key token.
    fn public(&self) -> Result<String, CryptoError>;

    /// A verifier for signatures produced by the matching private half.
    fn verifier(&self) -> Box<dyn Verifier>;
}

/// A key pair that can produce signatures.
pub trait SigningKey: VerificationKey {
    /// The identity string stamped into signed records. For software keys
    /// this is the public key token itself.
    fn identity(&self) -> Result<String, CryptoError>;

    /// Sign a message, returning the encoded signature token.
    fn sign(&self, message: &[u8]) -> Result<String, CryptoError>;
}

/// Resolves signing identities to verification keys.
pub trait VerificationKeyStore: Send + Sync {
    fn get(&self, identity: &str) -> Result<Arc<dyn VerificationKey>, SignatureError>;
}

/// The exact bytes a signature covers.
pub fn signed_message<T>(record: &T) -> Result<Vec<u8>, SignatureError>
where
    T: Signable + Serialize,
{
    Ok(canonical_json(record, AddressMask::None)?.into_bytes())
}

/// Sign a finalized record, stamping its signature.
///
/// The record must already carry the signer's identity and its address;
/// signing earlier would leave the signature covering stale bytes.
pub fn sign_record<T>(record: &mut T, key: &dyn SigningKey) -> Result<(), SignatureError>
where
    T: Signable + Serialize,
{
    let message = signed_message(record)?;
    let signature = key.sign(&message)?;
    record.set_signature(signature);
    Ok(())
}

/// Check a record's signature against the key its identity resolves to.
pub fn verify_signature<T>(
    record: &T,
    keys: &dyn VerificationKeyStore,
) -> Result<(), SignatureError>
where
    T: Signable + Serialize,
{
    let identity = record.signing_identity().ok_or(SignatureError::Unsigned)?;
    let signature = record.signature().ok_or(SignatureError::Unsigned)?;

    let key = keys.get(identity)?;
    let public = key.public()?;
    let message = signed_message(record)?;
    key.verifier().verify(signature, &public, &message)
}
