//! Repositories: the record lifecycle in one place.
//!
//! A repository owns the full sequence of steps that turn an edited record
//! into a stored version: advance the chain bookkeeping, salt it, stamp the
//! time, derive the self-address (and at genesis, the prefix), and persist.
//! Every read path re-verifies what it returns; a repository never hands
//! back a record whose address, chain, or signature fails to check out.
//!
//! [`Repository`] handles unsigned records. [`SignableRepository`] adds
//! signing: the signer's identity is stamped before addressing, so the
//! digest covers it, and the signature is produced after addressing, so it
//! covers the finalized id.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use veristore_core::error::EncodingError;
use veristore_core::{
    advance, apply_prefix, self_address, sign_record, verify_address, verify_genesis, verify_link,
    verify_prefix, verify_signature, Clock, Noncer, Recordable, Signable, SigningKey,
    VerificationKeyStore,
};
use veristore_store::{Condition, OrderBy, RecordRow, Store};

use crate::error::Result;

/// Behavior toggles for a repository.
#[derive(Debug, Clone, Copy)]
pub struct RepositoryConfig {
    /// Persist created versions. Disable for a dry run that still
    /// addresses (and signs) the record.
    pub write: bool,
    /// Stamp `createdAt` on created versions.
    pub timestamp: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            write: true,
            timestamp: true,
        }
    }
}

fn rehydrate<T: DeserializeOwned>(row: &RecordRow) -> Result<T> {
    serde_json::from_str(&row.body)
        .map_err(|e| EncodingError::Serialize(e.to_string()).into())
}

/// Verify a rehydrated version: prefix derivation at genesis, plain
/// self-address everywhere else.
fn verify_version<T>(record: &T) -> Result<()>
where
    T: Recordable + Serialize,
{
    if record.meta().sequence_number == 0 {
        verify_prefix(record)?;
    } else {
        verify_address(record)?;
    }
    Ok(())
}

/// Repository for unsigned records.
pub struct Repository<S: Store, T> {
    store: Arc<S>,
    noncer: Arc<dyn Noncer>,
    clock: Arc<dyn Clock>,
    config: RepositoryConfig,
    _record: PhantomData<fn() -> T>,
}

impl<S, T> Repository<S, T>
where
    S: Store,
    T: Recordable + Serialize + DeserializeOwned,
{
    pub fn new(
        store: Arc<S>,
        noncer: Arc<dyn Noncer>,
        clock: Arc<dyn Clock>,
        config: RepositoryConfig,
    ) -> Self {
        Self {
            store,
            noncer,
            clock,
            config,
            _record: PhantomData,
        }
    }

    /// Turn an edited record into the next version of its chain.
    ///
    /// On return the record carries its new id, sequence number, backlink,
    /// nonce, and (if configured) timestamp, and has been persisted.
    pub async fn create_version(&self, record: &mut T) -> Result<()> {
        advance(record.meta_mut())?;

        let meta = record.meta_mut();
        meta.nonce = Some(self.noncer.generate()?);
        if self.config.timestamp {
            meta.created_at = Some(self.clock.now());
        }

        if record.meta().sequence_number == 0 {
            apply_prefix(record)?;
        } else {
            self_address(record)?;
        }

        if self.config.write {
            let row = RecordRow::from_record(record)?;
            self.store.insert(T::TABLE, &row).await?;
        }

        debug!(
            table = T::TABLE,
            id = %record.meta().id,
            seq = record.meta().sequence_number,
            "created version"
        );
        Ok(())
    }

    /// Fetch one version by its self-address, verified.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<T>> {
        let Some(row) = self.store.get_by_id(T::TABLE, id).await? else {
            return Ok(None);
        };
        let record: T = rehydrate(&row)?;
        verify_version(&record)?;
        Ok(Some(record))
    }

    /// Fetch the latest version of a chain, verified.
    pub async fn get_latest(&self, prefix: &str) -> Result<Option<T>> {
        let Some(row) = self.store.get_latest_by_prefix(T::TABLE, prefix).await? else {
            return Ok(None);
        };
        let record: T = rehydrate(&row)?;
        verify_version(&record)?;
        Ok(Some(record))
    }

    /// Fetch a whole chain in sequence order, verifying every version and
    /// every link between consecutive versions.
    pub async fn history(&self, prefix: &str) -> Result<Vec<T>> {
        let rows = self.store.list_by_prefix(T::TABLE, prefix).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let record: T = rehydrate(row)?;
            verify_version(&record)?;
            records.push(record);
        }

        if let Some(first) = records.first() {
            verify_genesis(first.meta())?;
        }
        for pair in records.windows(2) {
            verify_link(pair[0].meta(), pair[1].meta())?;
        }

        Ok(records)
    }

    /// Fetch versions matching a condition, each individually verified.
    /// Chain links are not checked here; results may span chains.
    pub async fn search(
        &self,
        condition: Option<&Condition>,
        orderings: &[OrderBy],
    ) -> Result<Vec<T>> {
        let rows = self.store.search(T::TABLE, condition, orderings).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let record: T = rehydrate(row)?;
            if let Err(e) = verify_version(&record) {
                warn!(table = T::TABLE, id = %row.id, "search hit failed verification");
                return Err(e);
            }
            records.push(record);
        }
        Ok(records)
    }
}

/// Repository for signed records.
pub struct SignableRepository<S: Store, T> {
    store: Arc<S>,
    noncer: Arc<dyn Noncer>,
    clock: Arc<dyn Clock>,
    signing_key: Arc<dyn SigningKey>,
    key_store: Arc<dyn VerificationKeyStore>,
    config: RepositoryConfig,
    _record: PhantomData<fn() -> T>,
}

impl<S, T> SignableRepository<S, T>
where
    S: Store,
    T: Signable + Serialize + DeserializeOwned,
{
    pub fn new(
        store: Arc<S>,
        noncer: Arc<dyn Noncer>,
        clock: Arc<dyn Clock>,
        signing_key: Arc<dyn SigningKey>,
        key_store: Arc<dyn VerificationKeyStore>,
        config: RepositoryConfig,
    ) -> Self {
        Self {
            store,
            noncer,
            clock,
            signing_key,
            key_store,
            config,
            _record: PhantomData,
        }
    }

    /// Like [`Repository::create_version`], plus signing. Identity goes in
    /// before addressing, the signature is produced after, so verification
    /// is the exact inverse: check the address, then check the signature
    /// over the bytes that include it.
    pub async fn create_version(&self, record: &mut T) -> Result<()> {
        advance(record.meta_mut())?;

        let meta = record.meta_mut();
        meta.nonce = Some(self.noncer.generate()?);
        if self.config.timestamp {
            meta.created_at = Some(self.clock.now());
        }
        record.set_signing_identity(self.signing_key.identity()?);

        if record.meta().sequence_number == 0 {
            apply_prefix(record)?;
        } else {
            self_address(record)?;
        }

        sign_record(record, self.signing_key.as_ref())?;

        if self.config.write {
            let row = RecordRow::from_signable(record)?;
            self.store.insert(T::TABLE, &row).await?;
        }

        debug!(
            table = T::TABLE,
            id = %record.meta().id,
            seq = record.meta().sequence_number,
            "created signed version"
        );
        Ok(())
    }

    fn rehydrate_signed(&self, row: &RecordRow) -> Result<T> {
        let mut record: T = rehydrate(row)?;
        if let Some(signature) = &row.signature {
            record.set_signature(signature.clone());
        }
        verify_version(&record)?;
        verify_signature(&record, self.key_store.as_ref())?;
        Ok(record)
    }

    /// Fetch one version by its self-address, address- and
    /// signature-verified.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<T>> {
        match self.store.get_by_id(T::TABLE, id).await? {
            Some(row) => Ok(Some(self.rehydrate_signed(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetch the latest version of a chain, address- and
    /// signature-verified.
    pub async fn get_latest(&self, prefix: &str) -> Result<Option<T>> {
        match self.store.get_latest_by_prefix(T::TABLE, prefix).await? {
            Some(row) => Ok(Some(self.rehydrate_signed(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetch a whole chain, verifying addresses, signatures, and links.
    pub async fn history(&self, prefix: &str) -> Result<Vec<T>> {
        let rows = self.store.list_by_prefix(T::TABLE, prefix).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(self.rehydrate_signed(row)?);
        }

        if let Some(first) = records.first() {
            verify_genesis(first.meta())?;
        }
        for pair in records.windows(2) {
            verify_link(pair[0].meta(), pair[1].meta())?;
        }

        Ok(records)
    }

    /// Fetch versions matching a condition, each individually verified.
    pub async fn search(
        &self,
        condition: Option<&Condition>,
        orderings: &[OrderBy],
    ) -> Result<Vec<T>> {
        let rows = self.store.search(T::TABLE, condition, orderings).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(self.rehydrate_signed(row)?);
        }
        Ok(records)
    }
}
