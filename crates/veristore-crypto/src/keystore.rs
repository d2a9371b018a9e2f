//! In-memory verification key registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use veristore_core::error::SignatureError;
use veristore_core::{VerificationKey, VerificationKeyStore};

/// Maps signing identities to verification keys. Suitable for tests and for
/// processes that load their trust set at startup.
#[derive(Default)]
pub struct InMemoryKeyStore {
    keys: RwLock<HashMap<String, Arc<dyn VerificationKey>>>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key under an identity, replacing any previous entry.
    pub fn add(&self, identity: String, key: Arc<dyn VerificationKey>) {
        // Lock poisoning means a writer panicked; nothing to recover here.
        let mut keys = self.keys.write().unwrap_or_else(|e| e.into_inner());
        keys.insert(identity, key);
    }
}

impl VerificationKeyStore for InMemoryKeyStore {
    fn get(&self, identity: &str) -> Result<Arc<dyn VerificationKey>, SignatureError> {
        let keys = self.keys.read().unwrap_or_else(|e| e.into_inner());
        keys.get(identity)
            .cloned()
            .ok_or_else(|| SignatureError::KeyNotFound(identity.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ed25519::Ed25519Keypair;

    #[test]
    fn test_resolves_registered_identity() {
        let store = InMemoryKeyStore::new();
        let key = Arc::new(Ed25519Keypair::from_seed([7u8; 32]));
        let identity = key.public().unwrap();
        store.add(identity.clone(), key.clone());

        let resolved = store.get(&identity).unwrap();
        assert_eq!(resolved.public().unwrap(), identity);
    }

    #[test]
    fn test_unknown_identity() {
        let store = InMemoryKeyStore::new();
        assert!(matches!(
            store.get("Bunknown"),
            Err(SignatureError::KeyNotFound(_))
        ));
    }
}
