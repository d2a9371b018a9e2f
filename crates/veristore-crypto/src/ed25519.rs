//! Ed25519 key pairs speaking the token encoding.

use ed25519_dalek::{Signature, Signer as _, Verifier as _, VerifyingKey};
use rand::rngs::OsRng;

use veristore_core::error::{CryptoError, SignatureError};
use veristore_core::{decode, encode, Code, SigningKey, VerificationKey, Verifier};

/// An Ed25519 key pair. The public key token doubles as the signing
/// identity stamped into records.
pub struct Ed25519Keypair {
    key: ed25519_dalek::SigningKey,
}

impl Ed25519Keypair {
    /// Generate a fresh key pair from the system RNG.
    pub fn generate() -> Self {
        Self {
            key: ed25519_dalek::SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic key pair from a 32-byte seed. Test fixtures only;
    /// production keys come from [`Ed25519Keypair::generate`].
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            key: ed25519_dalek::SigningKey::from_bytes(&seed),
        }
    }
}

impl VerificationKey for Ed25519Keypair {
    fn public(&self) -> Result<String, CryptoError> {
        encode(Code::Ed25519PublicKey, self.key.verifying_key().as_bytes())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))
    }

    fn verifier(&self) -> Box<dyn Verifier> {
        Box::new(Ed25519Verifier)
    }
}

impl SigningKey for Ed25519Keypair {
    fn identity(&self) -> Result<String, CryptoError> {
        self.public()
    }

    fn sign(&self, message: &[u8]) -> Result<String, CryptoError> {
        let signature = self.key.sign(message);
        encode(Code::Ed25519Signature, &signature.to_bytes())
            .map_err(|e| CryptoError::Signing(e.to_string()))
    }
}

/// The public half alone, as resolved from a key store.
pub struct Ed25519PublicKey {
    public: String,
}

impl Ed25519PublicKey {
    pub fn new(public: String) -> Self {
        Self { public }
    }
}

impl VerificationKey for Ed25519PublicKey {
    fn public(&self) -> Result<String, CryptoError> {
        Ok(self.public.clone())
    }

    fn verifier(&self) -> Box<dyn Verifier> {
        Box::new(Ed25519Verifier)
    }
}

/// Stateless Ed25519 verifier over encoded tokens.
pub struct Ed25519Verifier;

impl Verifier for Ed25519Verifier {
    fn verify(
        &self,
        signature: &str,
        public_key: &str,
        message: &[u8],
    ) -> Result<(), SignatureError> {
        let (code, raw) = decode(public_key)?;
        if code != Code::Ed25519PublicKey {
            return Err(SignatureError::Crypto(CryptoError::InvalidKey(format!(
                "expected an Ed25519 public key token, got code {:?}",
                code.text()
            ))));
        }
        let key_bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| SignatureError::Crypto(CryptoError::InvalidKey("bad length".into())))?;
        let key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| SignatureError::Crypto(CryptoError::InvalidKey(e.to_string())))?;

        let (code, raw) = decode(signature)?;
        if code != Code::Ed25519Signature {
            return Err(SignatureError::Invalid);
        }
        let sig_bytes: [u8; 64] = raw.try_into().map_err(|_| SignatureError::Invalid)?;
        let signature = Signature::from_bytes(&sig_bytes);

        key.verify(message, &signature)
            .map_err(|_| SignatureError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_token_shape() {
        let key = Ed25519Keypair::from_seed([0u8; 32]);
        let public = key.public().unwrap();
        assert!(public.starts_with('B'));
        assert_eq!(public.len(), 44);
    }

    #[test]
    fn test_zero_seed_public_token() {
        let key = Ed25519Keypair::from_seed([0u8; 32]);
        assert_eq!(
            key.public().unwrap(),
            "BDtqJ7zOtqQtYqOo0CpvDXNlMhV3HeJDpjrASKGLWdop"
        );
    }

    #[test]
    fn test_sign_then_verify() {
        let key = Ed25519Keypair::generate();
        let message = b"the canonical bytes";
        let signature = key.sign(message).unwrap();
        assert!(signature.starts_with("0B"));
        assert_eq!(signature.len(), 88);
        key.verifier()
            .verify(&signature, &key.public().unwrap(), message)
            .unwrap();
    }

    #[test]
    fn test_verify_rejects_wrong_message() {
        let key = Ed25519Keypair::generate();
        let signature = key.sign(b"one message").unwrap();
        assert!(matches!(
            key.verifier()
                .verify(&signature, &key.public().unwrap(), b"another message"),
            Err(SignatureError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let signer = Ed25519Keypair::generate();
        let other = Ed25519Keypair::generate();
        let signature = signer.sign(b"message").unwrap();
        assert!(matches!(
            signer
                .verifier()
                .verify(&signature, &other.public().unwrap(), b"message"),
            Err(SignatureError::Invalid)
        ));
    }
}
