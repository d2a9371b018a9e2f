//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::condition::{Condition, Direction, OrderBy};
use crate::error::{Result, StoreError};
use crate::row::RecordRow;
use crate::traits::Store;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Rows per table, in insertion order.
    tables: HashMap<String, Vec<RecordRow>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_rows(rows: &mut [RecordRow], orderings: &[OrderBy]) {
    rows.sort_by(|a, b| {
        for ordering in orderings {
            let left = a.column(&ordering.column);
            let right = b.column(&ordering.column);
            let compared = match (left, right) {
                (Some(l), Some(r)) => l.compare(&r).unwrap_or(std::cmp::Ordering::Equal),
                _ => std::cmp::Ordering::Equal,
            };
            let compared = match ordering.direction {
                Direction::Ascending => compared,
                Direction::Descending => compared.reverse(),
            };
            if compared != std::cmp::Ordering::Equal {
                return compared;
            }
        }
        std::cmp::Ordering::Equal
    });
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, table: &str, row: &RecordRow) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let rows = inner.tables.entry(table.to_string()).or_default();

        if rows.iter().any(|existing| existing.id == row.id) {
            return Err(StoreError::Duplicate {
                table: table.to_string(),
                id: row.id.clone(),
            });
        }
        if rows.iter().any(|existing| {
            existing.prefix == row.prefix && existing.sequence_number == row.sequence_number
        }) {
            return Err(StoreError::Conflict {
                table: table.to_string(),
                prefix: row.prefix.clone(),
                sequence_number: row.sequence_number,
            });
        }

        rows.push(row.clone());
        Ok(())
    }

    async fn get_by_id(&self, table: &str, id: &str) -> Result<Option<RecordRow>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| row.id == id))
            .cloned())
    }

    async fn get_latest_by_prefix(&self, table: &str, prefix: &str) -> Result<Option<RecordRow>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.tables.get(table).and_then(|rows| {
            rows.iter()
                .filter(|row| row.prefix == prefix)
                .max_by_key(|row| row.sequence_number)
                .cloned()
        }))
    }

    async fn list_by_prefix(&self, table: &str, prefix: &str) -> Result<Vec<RecordRow>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut rows: Vec<RecordRow> = inner
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.prefix == prefix)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|row| row.sequence_number);
        Ok(rows)
    }

    async fn search(
        &self,
        table: &str,
        condition: Option<&Condition>,
        orderings: &[OrderBy],
    ) -> Result<Vec<RecordRow>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut rows: Vec<RecordRow> = inner
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| condition.map_or(true, |c| c.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        sort_rows(&mut rows, orderings);
        Ok(rows)
    }
}
