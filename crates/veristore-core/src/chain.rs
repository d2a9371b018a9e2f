//! Sequence and backlink bookkeeping between versions.

use crate::error::ChainError;
use crate::record::VersionMeta;

/// Advance a record's meta to the next version.
///
/// An unaddressed record becomes version 0. An addressed record moves its
/// current `id` into `previous` and increments the sequence; the caller is
/// expected to re-address it afterwards.
pub fn advance(meta: &mut VersionMeta) -> Result<(), ChainError> {
    if meta.id.is_empty() {
        meta.sequence_number = 0;
        meta.previous = None;
    } else {
        meta.previous = Some(meta.id.clone());
        meta.sequence_number = meta
            .sequence_number
            .checked_add(1)
            .ok_or(ChainError::SequenceOverflow)?;
    }
    Ok(())
}

/// Check the invariants that hold only at version 0.
pub fn verify_genesis(meta: &VersionMeta) -> Result<(), ChainError> {
    if meta.sequence_number != 0 {
        return Err(ChainError::SequenceGap {
            expected: 0,
            got: meta.sequence_number,
        });
    }
    if meta.previous.is_some() {
        return Err(ChainError::UnexpectedBacklink);
    }
    Ok(())
}

/// Check that `next` directly follows `prev` in the same chain.
pub fn verify_link(prev: &VersionMeta, next: &VersionMeta) -> Result<(), ChainError> {
    let expected = prev
        .sequence_number
        .checked_add(1)
        .ok_or(ChainError::SequenceOverflow)?;
    if next.sequence_number != expected {
        return Err(ChainError::SequenceGap {
            expected,
            got: next.sequence_number,
        });
    }
    if next.previous.as_deref() != Some(prev.id.as_str()) {
        return Err(ChainError::BrokenBacklink {
            seq: next.sequence_number,
            expected: Some(prev.id.clone()),
            got: next.previous.clone(),
        });
    }
    if next.prefix != prev.prefix {
        return Err(ChainError::PrefixChanged {
            seq: next.sequence_number,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addressed(id: &str, prefix: &str, seq: u64, previous: Option<&str>) -> VersionMeta {
        VersionMeta {
            id: id.into(),
            prefix: prefix.into(),
            sequence_number: seq,
            previous: previous.map(Into::into),
            nonce: None,
            created_at: None,
        }
    }

    #[test]
    fn test_advance_from_blank_is_genesis() {
        let mut meta = VersionMeta::default();
        advance(&mut meta).unwrap();
        assert_eq!(meta.sequence_number, 0);
        assert!(meta.previous.is_none());
    }

    #[test]
    fn test_advance_links_back_to_current_id() {
        let mut meta = addressed("Ev0", "Ev0", 0, None);
        advance(&mut meta).unwrap();
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.previous.as_deref(), Some("Ev0"));
    }

    #[test]
    fn test_advance_overflow() {
        let mut meta = addressed("Ev", "Ep", u64::MAX, None);
        assert!(matches!(
            advance(&mut meta),
            Err(ChainError::SequenceOverflow)
        ));
    }

    #[test]
    fn test_genesis_rejects_backlink() {
        let meta = addressed("Ev0", "Ev0", 0, Some("Eghost"));
        assert!(matches!(
            verify_genesis(&meta),
            Err(ChainError::UnexpectedBacklink)
        ));
    }

    #[test]
    fn test_link_accepts_direct_successor() {
        let prev = addressed("Ev0", "Ev0", 0, None);
        let next = addressed("Ev1", "Ev0", 1, Some("Ev0"));
        verify_link(&prev, &next).unwrap();
    }

    #[test]
    fn test_link_rejects_gap() {
        let prev = addressed("Ev0", "Ev0", 0, None);
        let next = addressed("Ev2", "Ev0", 2, Some("Ev1"));
        assert!(matches!(
            verify_link(&prev, &next),
            Err(ChainError::SequenceGap { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn test_link_rejects_wrong_backlink() {
        let prev = addressed("Ev0", "Ev0", 0, None);
        let next = addressed("Ev1", "Ev0", 1, Some("Eother"));
        assert!(matches!(
            verify_link(&prev, &next),
            Err(ChainError::BrokenBacklink { seq: 1, .. })
        ));
    }

    #[test]
    fn test_link_rejects_prefix_change() {
        let prev = addressed("Ev0", "Ev0", 0, None);
        let next = addressed("Ev1", "Eother", 1, Some("Ev0"));
        assert!(matches!(
            verify_link(&prev, &next),
            Err(ChainError::PrefixChanged { seq: 1 })
        ));
    }
}
