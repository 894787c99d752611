use ahash::AHashMap as HashMap;
use log::debug;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::conflict::detection::detect_conflicts;
use crate::data_store::txn_buffer::TxnBuffer;
use crate::data_store::versioned_value::VersionedValue;
use crate::errors::{MaatError, Result};
use crate::storage::{Storage, StorageMutation};

/// Represents a single transaction.
///
/// A transaction provides a mechanism for performing a series of read,
/// write, and delete operations on the data buffer atomically and in
/// isolation. Transactions are created by the [`crate::Maat`] instance and
/// manage their own read and write sets; nothing is visible to other
/// transactions until `commit` succeeds.
///
/// Isolation is serializable: commit validates that every version this
/// transaction observed is still current, and the first committer wins any
/// overlap. A failed validation surfaces as
/// [`MaatError::TransactionConflict`], which the workflow layer classifies
/// as retryable.
pub struct Transaction {
    /// Unique identifier for the transaction, drawn from the same counter
    /// as commit versions.
    id: u64,
    /// Reference to the transaction buffer.
    txn_buffer: Arc<TxnBuffer>,
    /// Reference to the global transaction counter.
    transaction_counter: Arc<AtomicU64>,
    /// Reference to the storage implementation.
    storage: Arc<dyn Storage>,
    /// Serializes the validate-and-apply section of commit.
    commit_lock: Arc<Mutex<()>>,
    /// The set of keys read by this transaction and the versions observed.
    /// Absent keys are recorded at version 0.
    read_set: HashMap<String, u64>,
    /// Staged changes for this transaction. `Some` is an insert or update,
    /// `None` a deletion.
    write_set: HashMap<String, Option<Vec<u8>>>,
}

impl Transaction {
    /// Returns the unique identifier of the transaction.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Creates a new transaction. Called by [`crate::Maat::start_transaction`].
    pub(crate) fn new(
        id: u64,
        txn_buffer: Arc<TxnBuffer>,
        transaction_counter: Arc<AtomicU64>,
        storage: Arc<dyn Storage>,
        commit_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            id,
            txn_buffer,
            transaction_counter,
            storage,
            commit_lock,
            read_set: HashMap::new(),
            write_set: HashMap::new(),
        }
    }

    /// Reads the value associated with a key.
    ///
    /// If the key has been modified within this transaction's write set,
    /// the staged change is returned. Otherwise the latest committed value
    /// is read from the buffer and its version is recorded in the read set
    /// for validation at commit. Reading an absent key records version 0,
    /// so a concurrent insert of the key still fails this transaction's
    /// commit.
    pub fn read(&mut self, key: &str) -> Result<Option<Arc<Vec<u8>>>> {
        if let Some(change) = self.write_set.get(key) {
            return Ok(change.as_ref().map(|bytes| Arc::new(bytes.clone())));
        }

        match self.txn_buffer.get(&key.to_string()) {
            Some(value) => {
                self.read_set.insert(key.to_string(), value.version());
                Ok(Some(value.data().clone()))
            }
            None => {
                self.read_set.insert(key.to_string(), 0);
                Ok(None)
            }
        }
    }

    /// Stages a write of `value` under `key`, replacing any committed value
    /// on commit.
    pub fn write(&mut self, key: String, value: Vec<u8>) -> Result<()> {
        self.write_set.insert(key, Some(value));
        Ok(())
    }

    /// Stages a deletion of `key`. The actual removal happens on commit.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        self.write_set.insert(key.to_string(), None);
        Ok(())
    }

    /// Returns all visible entries whose key starts with `prefix`, in key
    /// order, with this transaction's staged writes layered over committed
    /// state.
    ///
    /// Every committed key the scan observes is recorded in the read set.
    /// The scan validates the keys it saw, not phantoms; the workflow layer
    /// only appends fresh unique keys under scanned prefixes, so phantom
    /// ranges are not a correctness concern here.
    pub fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<(String, Arc<Vec<u8>>)>> {
        let mut merged: BTreeMap<String, Arc<Vec<u8>>> = BTreeMap::new();

        for (key, value) in self.txn_buffer.scan_prefix(prefix) {
            if !self.read_set.contains_key(&key) {
                self.read_set.insert(key.clone(), value.version());
            }
            merged.insert(key, value.data().clone());
        }

        for (key, change) in &self.write_set {
            if !key.starts_with(prefix) {
                continue;
            }
            match change {
                Some(bytes) => {
                    merged.insert(key.clone(), Arc::new(bytes.clone()));
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }

    /// Attempts to commit the transaction.
    ///
    /// Validation and application run under the engine's commit lock:
    /// 1. The read and write sets are checked against the buffer via
    ///    [`detect_conflicts`]. Any stale observation aborts the commit
    ///    with [`MaatError::TransactionConflict`]; the buffer is untouched.
    /// 2. On success the next commit version is assigned, the write set is
    ///    applied to the buffer, and the same mutations are handed to the
    ///    [`Storage`] implementation for persistence.
    ///
    /// A conflicting commit leaves zero observable trace; callers restart
    /// with a fresh transaction rather than reusing any state from this one.
    pub fn commit(self) -> Result<()> {
        let Transaction {
            id,
            txn_buffer,
            transaction_counter,
            storage,
            commit_lock,
            read_set,
            write_set,
        } = self;

        let _guard = commit_lock.lock();

        let conflicts = detect_conflicts(id, &read_set, &write_set, &txn_buffer);
        if !conflicts.is_empty() {
            debug!(
                "transaction {} aborted at commit: {} conflicting key(s)",
                id,
                conflicts.len()
            );
            return Err(MaatError::TransactionConflict);
        }

        let commit_version = transaction_counter.fetch_add(1, Ordering::SeqCst);

        let mut mutations_to_persist: Vec<StorageMutation> = Vec::with_capacity(write_set.len());
        for (key, change) in write_set {
            match change {
                Some(bytes) => {
                    txn_buffer.insert(
                        key.clone(),
                        VersionedValue::new(Arc::new(bytes.clone()), commit_version),
                    );
                    mutations_to_persist.push(StorageMutation::Insert(key, bytes));
                }
                None => {
                    txn_buffer.delete(&key);
                    mutations_to_persist.push(StorageMutation::Delete(key));
                }
            }
        }

        storage.apply_mutations(mutations_to_persist)?;

        debug!("transaction {} committed at version {}", id, commit_version);
        Ok(())
    }

    /// Aborts the transaction, discarding staged changes.
    ///
    /// The buffer remains unaffected by the operations performed within
    /// this transaction.
    pub fn rollback(self) {
        debug!("Transaction {} rolled back", self.id);
        // The `write_set` and `read_set` are dropped with `self`.
    }
}
