//! Chain-root derivation.
//!
//! The prefix is the stable name of a chain: the self-address of version 0,
//! computed with both `id` and `prefix` masked so the digest can occupy both
//! fields. Every later version carries the same prefix, so verifying it on
//! version 0 anchors the whole chain to its genesis content.

use serde::Serialize;

use crate::canonical::{canonical_json, AddressMask};
use crate::encoding::{encode, Code};
use crate::error::IntegrityError;
use crate::record::Recordable;

/// Compute the genesis digest without modifying the record.
pub fn compute_prefix<T>(record: &T) -> Result<String, IntegrityError>
where
    T: Recordable + Serialize,
{
    let canonical = canonical_json(record, AddressMask::IdAndPrefix)?;
    let digest = blake3::hash(canonical.as_bytes());
    Ok(encode(Code::Blake3Address, digest.as_bytes())?)
}

/// Stamp the genesis digest into both `id` and `prefix`.
pub fn apply_prefix<T>(record: &mut T) -> Result<(), IntegrityError>
where
    T: Recordable + Serialize,
{
    let prefix = compute_prefix(record)?;
    let meta = record.meta_mut();
    meta.id = prefix.clone();
    meta.prefix = prefix;
    Ok(())
}

/// Check that a genesis record's `id` and `prefix` both match its content.
pub fn verify_prefix<T>(record: &T) -> Result<(), IntegrityError>
where
    T: Recordable + Serialize,
{
    if record.meta().id.is_empty() {
        return Err(IntegrityError::MissingAddress);
    }
    let computed = compute_prefix(record)?;
    if record.meta().id != computed {
        return Err(IntegrityError::AddressMismatch {
            stored: record.meta().id.clone(),
            computed,
        });
    }
    if record.meta().prefix != computed {
        return Err(IntegrityError::PrefixMismatch {
            stored: record.meta().prefix.clone(),
            computed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
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

    #[test]
    fn test_prefix_equals_genesis_id() {
        let mut n = Note {
            meta: VersionMeta::default(),
            body: "hello".into(),
        };
        apply_prefix(&mut n).unwrap();
        assert_eq!(n.meta.id, n.meta.prefix);
        verify_prefix(&n).unwrap();
    }

    #[test]
    fn test_tampered_prefix_detected() {
        let mut n = Note {
            meta: VersionMeta::default(),
            body: "hello".into(),
        };
        apply_prefix(&mut n).unwrap();
        n.meta.prefix = n.meta.prefix.replace('E', "F");
        // The digest masks the prefix field, so the id still checks out
        // and the prefix comparison is what fires.
        assert!(matches!(
            verify_prefix(&n),
            Err(IntegrityError::PrefixMismatch { .. })
        ));
    }

    #[test]
    fn test_prefix_differs_from_plain_address() {
        let n = Note {
            meta: VersionMeta::default(),
            body: "hello".into(),
        };
        let prefix = compute_prefix(&n).unwrap();
        let address = crate::address::compute_address(&n).unwrap();
        assert_ne!(prefix, address);
    }
}
