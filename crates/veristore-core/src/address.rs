//! Self-addressing.
//!
//! A version's identifier is the Blake3-256 digest of its own canonical
//! bytes, computed with the `id` field masked by the placeholder. Anyone
//! holding the record can recompute the digest and compare.

use serde::Serialize;

use crate::canonical::{canonical_json, AddressMask};
use crate::encoding::{encode, Code};
use crate::error::IntegrityError;
use crate::record::Recordable;

/// Compute the self-address of a record without modifying it.
pub fn compute_address<T>(record: &T) -> Result<String, IntegrityError>
where
    T: Recordable + Serialize,
{
    let canonical = canonical_json(record, AddressMask::Id)?;
    let digest = blake3::hash(canonical.as_bytes());
    Ok(encode(Code::Blake3Address, digest.as_bytes())?)
}

/// Compute the self-address and stamp it into the record's `id`.
pub fn self_address<T>(record: &mut T) -> Result<(), IntegrityError>
where
    T: Recordable + Serialize,
{
    let address = compute_address(record)?;
    record.meta_mut().id = address;
    Ok(())
}

/// Check that a record's stored `id` matches its content.
pub fn verify_address<T>(record: &T) -> Result<(), IntegrityError>
where
    T: Recordable + Serialize,
{
    if record.meta().id.is_empty() {
        return Err(IntegrityError::MissingAddress);
    }
    let computed = compute_address(record)?;
    if record.meta().id != computed {
        return Err(IntegrityError::AddressMismatch {
            stored: record.meta().id.clone(),
            computed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::record::VersionMeta;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Note {
        #[serde(flatten)]
        meta: VersionMeta,
        body: String,
    }

    impl Recordable for Note {
        const TABLE: &'static str = "notes";
        const COLUMNS: &'static [&'static str] = &["body"];

        fn meta(&self) -> &VersionMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut VersionMeta {
            &mut self.meta
        }
    }

    fn note(body: &str) -> Note {
        Note {
            meta: VersionMeta {
                prefix: "Eprefix".into(),
                ..VersionMeta::default()
            },
            body: body.into(),
        }
    }

    #[test]
    fn test_address_then_verify() {
        let mut n = note("hello");
        self_address(&mut n).unwrap();
        assert!(n.meta.id.starts_with('E'));
        assert_eq!(n.meta.id.len(), 44);
        verify_address(&n).unwrap();
    }

    #[test]
    fn test_addressing_is_idempotent() {
        let mut n = note("hello");
        self_address(&mut n).unwrap();
        let first = n.meta.id.clone();
        self_address(&mut n).unwrap();
        assert_eq!(n.meta.id, first);
    }

    #[test]
    fn test_unaddressed_record_rejected() {
        assert!(matches!(
            verify_address(&note("hello")),
            Err(IntegrityError::MissingAddress)
        ));
    }

    #[test]
    fn test_tampered_payload_detected() {
        let mut n = note("hello");
        self_address(&mut n).unwrap();
        n.body = "goodbye".into();
        assert!(matches!(
            verify_address(&n),
            Err(IntegrityError::AddressMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_distinct_bodies_get_distinct_addresses(a in ".*", b in ".*") {
            prop_assume!(a != b);
            prop_assert_ne!(
                compute_address(&note(&a)).unwrap(),
                compute_address(&note(&b)).unwrap()
            );
        }

        #[test]
        fn prop_address_is_deterministic(body in ".*") {
            let mut n = note(&body);
            self_address(&mut n).unwrap();
            prop_assert!(verify_address(&n).is_ok());
        }
    }
}
