//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical text form and the derived identifiers,
//! so any implementation producing the same bytes produces the same ids.
//! All of them use a fixed all-zeroes nonce and a fixed start time, with
//! one second between versions.

use veristore_core::{
    advance, apply_prefix, self_address, verify_address, verify_prefix, Timestamp,
};

use crate::fixtures::PlainRecord;

/// The all-zeroes 128-bit nonce token.
pub const FIXED_NONCE: &str = "0A0000000000000000000000";

/// Creation time of version 0.
pub const T0: &str = "2025-10-13T20:25:32.722276000Z";

/// Ed25519 public key token for the all-zeroes seed.
pub const ZERO_SEED_IDENTITY: &str = "BDtqJ7zOtqQtYqOo0CpvDXNlMhV3HeJDpjrASKGLWdop";

/// A pinned version of the golden unsigned chain.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Position in the chain.
    pub sequence_number: u64,
    /// Expected self-address.
    pub id: &'static str,
    /// Expected backlink.
    pub previous: Option<&'static str>,
    /// Expected creation time.
    pub created_at: &'static str,
    /// Expected canonical body, byte for byte.
    pub body: &'static str,
}

/// Expected prefix of the golden unsigned chain (the id of version 0).
pub const GOLDEN_PREFIX: &str = "EKV6bgU7UuFzQYqsvovO2yPV6r6pZss6OzxpJJgI0HEq";

/// The golden unsigned chain: three versions of foo="bar", bar="foo".
pub fn unsigned_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            sequence_number: 0,
            id: "EKV6bgU7UuFzQYqsvovO2yPV6r6pZss6OzxpJJgI0HEq",
            previous: None,
            created_at: "2025-10-13T20:25:32.722276000Z",
            body: r#"{"id":"EKV6bgU7UuFzQYqsvovO2yPV6r6pZss6OzxpJJgI0HEq","prefix":"EKV6bgU7UuFzQYqsvovO2yPV6r6pZss6OzxpJJgI0HEq","sequenceNumber":0,"nonce":"0A0000000000000000000000","createdAt":"2025-10-13T20:25:32.722276000Z","foo":"bar","bar":"foo"}"#,
        },
        GoldenVector {
            sequence_number: 1,
            id: "EO_wM1UoWjk4aTOkrOdN56JxfNJBwGpKDpFAcaSlEiB3",
            previous: Some("EKV6bgU7UuFzQYqsvovO2yPV6r6pZss6OzxpJJgI0HEq"),
            created_at: "2025-10-13T20:25:33.722276000Z",
            body: r#"{"id":"EO_wM1UoWjk4aTOkrOdN56JxfNJBwGpKDpFAcaSlEiB3","prefix":"EKV6bgU7UuFzQYqsvovO2yPV6r6pZss6OzxpJJgI0HEq","sequenceNumber":1,"previous":"EKV6bgU7UuFzQYqsvovO2yPV6r6pZss6OzxpJJgI0HEq","nonce":"0A0000000000000000000000","createdAt":"2025-10-13T20:25:33.722276000Z","foo":"bar","bar":"foo"}"#,
        },
        GoldenVector {
            sequence_number: 2,
            id: "EK-eJ0YStKtbjNoLeFUrC1secwP9rtqE4gQ9_cKKwmuu",
            previous: Some("EO_wM1UoWjk4aTOkrOdN56JxfNJBwGpKDpFAcaSlEiB3"),
            created_at: "2025-10-13T20:25:34.722276000Z",
            body: r#"{"id":"EK-eJ0YStKtbjNoLeFUrC1secwP9rtqE4gQ9_cKKwmuu","prefix":"EKV6bgU7UuFzQYqsvovO2yPV6r6pZss6OzxpJJgI0HEq","sequenceNumber":2,"previous":"EO_wM1UoWjk4aTOkrOdN56JxfNJBwGpKDpFAcaSlEiB3","nonce":"0A0000000000000000000000","createdAt":"2025-10-13T20:25:34.722276000Z","foo":"bar","bar":"foo"}"#,
        },
    ]
}

/// Build the golden unsigned chain from the core primitives alone, one
/// record per vector.
pub fn build_unsigned_chain() -> Vec<PlainRecord> {
    let t0 = Timestamp::parse(T0).unwrap();
    let mut record = PlainRecord::sample();
    let mut chain = Vec::with_capacity(3);

    for step in 0..3i64 {
        advance(&mut record.meta).unwrap();
        record.meta.nonce = Some(FIXED_NONCE.to_string());
        record.meta.created_at = Some(t0.plus_seconds(step));

        if record.meta.sequence_number == 0 {
            apply_prefix(&mut record).unwrap();
        } else {
            self_address(&mut record).unwrap();
        }
        chain.push(record.clone());
    }

    chain
}

/// Rebuild the golden chain and check every pinned value.
pub fn verify_unsigned_vectors() -> Result<(), String> {
    let chain = build_unsigned_chain();
    let vectors = unsigned_vectors();

    for (record, vector) in chain.iter().zip(&vectors) {
        if record.meta.id != vector.id {
            return Err(format!(
                "sequence {}: id {} != expected {}",
                vector.sequence_number, record.meta.id, vector.id
            ));
        }
        if record.meta.prefix != GOLDEN_PREFIX {
            return Err(format!(
                "sequence {}: prefix {} != expected {}",
                vector.sequence_number, record.meta.prefix, GOLDEN_PREFIX
            ));
        }
        let check = if vector.sequence_number == 0 {
            verify_prefix(record)
        } else {
            verify_address(record)
        };
        check.map_err(|e| e.to_string())?;
    }

    Ok(())
}
