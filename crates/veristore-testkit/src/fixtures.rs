//! Helper structs for setting up test scenarios.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use veristore_core::error::CryptoError;
use veristore_core::{
    Clock, Noncer, Recordable, Signable, SigningMeta, Timestamp, VersionMeta,
};

use crate::vectors::{FIXED_NONCE, T0};

/// A noncer that always returns the same token, so hashes are reproducible.
pub struct FixedNoncer(pub String);

impl Default for FixedNoncer {
    fn default() -> Self {
        Self(FIXED_NONCE.to_string())
    }
}

impl Noncer for FixedNoncer {
    fn generate(&self) -> Result<String, CryptoError> {
        Ok(self.0.clone())
    }
}

/// A clock that stands still until told to advance.
pub struct FixedClock {
    now: Mutex<Timestamp>,
}

impl FixedClock {
    /// A clock parked at the golden-vector epoch.
    pub fn at_epoch() -> Self {
        Self::starting_at(Timestamp::parse(T0).unwrap())
    }

    pub fn starting_at(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward by whole seconds.
    pub fn advance_seconds(&self, seconds: i64) {
        let mut now = self.now.lock().unwrap();
        *now = now.plus_seconds(seconds);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }
}

/// The unsigned record shape used throughout the golden vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlainRecord {
    #[serde(flatten)]
    pub meta: VersionMeta,
    pub foo: String,
    pub bar: String,
}

impl Recordable for PlainRecord {
    const TABLE: &'static str = "records";
    const COLUMNS: &'static [&'static str] = &["foo", "bar"];

    fn meta(&self) -> &VersionMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut VersionMeta {
        &mut self.meta
    }
}

impl PlainRecord {
    /// The golden-vector payload: foo="bar", bar="foo".
    pub fn sample() -> Self {
        Self {
            meta: VersionMeta::default(),
            foo: "bar".into(),
            bar: "foo".into(),
        }
    }
}

/// The signed counterpart of [`PlainRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignedRecord {
    #[serde(flatten)]
    pub meta: VersionMeta,
    #[serde(flatten)]
    pub signing: SigningMeta,
    pub foo: String,
    pub bar: String,
}

impl Recordable for SignedRecord {
    const TABLE: &'static str = "signed_records";
    const COLUMNS: &'static [&'static str] = &["foo", "bar"];

    fn meta(&self) -> &VersionMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut VersionMeta {
        &mut self.meta
    }
}

impl Signable for SignedRecord {
    fn signing_identity(&self) -> Option<&str> {
        self.signing.signing_identity.as_deref()
    }

    fn set_signing_identity(&mut self, identity: String) {
        self.signing.signing_identity = Some(identity);
    }

    fn signature(&self) -> Option<&str> {
        self.signing.signature.as_deref()
    }

    fn set_signature(&mut self, signature: String) {
        self.signing.signature = Some(signature);
    }
}

impl SignedRecord {
    pub fn sample() -> Self {
        Self {
            meta: VersionMeta::default(),
            signing: SigningMeta::default(),
            foo: "bar".into(),
            bar: "foo".into(),
        }
    }
}
