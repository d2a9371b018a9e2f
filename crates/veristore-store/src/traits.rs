//! The Store trait: what any storage backend must provide.

use async_trait::async_trait;

use crate::condition::{Condition, OrderBy};
use crate::error::Result;
use crate::row::RecordRow;

/// Append-only versioned record storage.
///
/// Implementations enforce two uniqueness rules per table: no two rows
/// share an `id`, and no two rows share a `(prefix, sequence_number)`
/// position. Nothing is ever updated or deleted; a new version is a new
/// row.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new version.
    ///
    /// Returns [`StoreError::Duplicate`](crate::StoreError::Duplicate) if
    /// the id exists, [`StoreError::Conflict`](crate::StoreError::Conflict)
    /// if the chain position is taken.
    async fn insert(&self, table: &str, row: &RecordRow) -> Result<()>;

    /// Fetch one version by its self-address.
    async fn get_by_id(&self, table: &str, id: &str) -> Result<Option<RecordRow>>;

    /// Fetch the highest-sequence version of a chain.
    async fn get_latest_by_prefix(&self, table: &str, prefix: &str) -> Result<Option<RecordRow>>;

    /// Fetch every version of a chain, ordered by sequence number.
    async fn list_by_prefix(&self, table: &str, prefix: &str) -> Result<Vec<RecordRow>>;

    /// Fetch rows matching a condition, in the given order.
    async fn search(
        &self,
        table: &str,
        condition: Option<&Condition>,
        orderings: &[OrderBy],
    ) -> Result<Vec<RecordRow>>;
}
