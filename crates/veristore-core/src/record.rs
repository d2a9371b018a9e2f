//! Versioned record model.
//!
//! A record type embeds [`VersionMeta`] (flattened) and declares its payload
//! columns in a fixed order. The declaration drives canonical serialization
//! and the storage schema, so a record's identity is a function of its
//! declared shape, never of field discovery at runtime.

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// Identity and lineage fields shared by every versioned record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionMeta {
    /// Self-address of this version. Empty until addressed.
    #[serde(default)]
    pub id: String,

    /// Address of version 0, constant across the chain.
    #[serde(default)]
    pub prefix: String,

    /// Zero-based position in the chain.
    #[serde(rename = "sequenceNumber", default)]
    pub sequence_number: u64,

    /// Address of the immediately preceding version. Absent at genesis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,

    /// Per-version salt, making equal payloads hash differently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Creation instant, stamped by the lifecycle controller.
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<Timestamp>,
}

/// Signing fields for record types that are signed as well as addressed.
///
/// The signature is excluded from serialization entirely: it is computed
/// over the canonical bytes, so it can never be part of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SigningMeta {
    /// Public key token of the signer. Covered by the self-address.
    #[serde(
        rename = "signingIdentity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub signing_identity: Option<String>,

    #[serde(skip)]
    pub signature: Option<String>,
}

/// A versioned, self-addressed record.
pub trait Recordable {
    /// Storage table name.
    const TABLE: &'static str;

    /// Payload column names, in canonical serialization order. Meta fields
    /// are never listed here.
    const COLUMNS: &'static [&'static str];

    fn meta(&self) -> &VersionMeta;
    fn meta_mut(&mut self) -> &mut VersionMeta;
}

/// A record that additionally carries a signature over its canonical bytes.
pub trait Signable: Recordable {
    fn signing_identity(&self) -> Option<&str>;
    fn set_signing_identity(&mut self, identity: String);
    fn signature(&self) -> Option<&str>;
    fn set_signature(&mut self, signature: String);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_omits_absent_fields() {
        let meta = VersionMeta::default();
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"id":"","prefix":"","sequenceNumber":0}"#);
    }

    #[test]
    fn test_meta_renames_camel_case() {
        let meta = VersionMeta {
            id: "a".into(),
            prefix: "b".into(),
            sequence_number: 3,
            previous: Some("c".into()),
            nonce: Some("d".into()),
            created_at: None,
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains(r#""sequenceNumber":3"#));
        assert!(json.contains(r#""previous":"c""#));
    }

    #[test]
    fn test_signature_never_serialized() {
        let signing = SigningMeta {
            signing_identity: Some("Bkey".into()),
            signature: Some("0Bsig".into()),
        };
        let json = serde_json::to_string(&signing).unwrap();
        assert!(json.contains("signingIdentity"));
        assert!(!json.contains("0Bsig"));
    }
}
