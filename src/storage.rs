use crate::errors::Result;

/// The key type for data items in the store. Using String for now.
type DataKey = String;

/// Represents a single mutation to be applied to the storage layer.
///
/// `StorageMutation` describes a change (insert, update, or delete) that
/// needs to be persisted to durable storage as part of a committed
/// transaction.
#[derive(Debug)]
pub enum StorageMutation {
    /// Insert or update a record with the given key and encoded bytes.
    /// If a record with the same key already exists, it should be updated.
    Insert(DataKey, Vec<u8>),
    /// Delete the record with the given key.
    /// If no record with the key exists, this mutation should be a no-op.
    Delete(DataKey),
}

/// Trait for interacting with a storage layer to persist committed data.
///
/// Implementations are responsible for durably storing the data committed
/// through [`crate::Transaction`]. The engine hands over the full list of
/// `StorageMutation`s of one committed transaction; the implementation must
/// apply them as a single atomic unit, either all mutations or none. The
/// trait carries no transaction logic of its own.
///
/// Implementations must be `Send` and `Sync` to be used concurrently by
/// multiple transactions.
pub trait Storage: Send + Sync {
    /// Atomically applies the given mutations to the storage layer.
    ///
    /// # Errors
    ///
    /// Returns `MaatError::StorageError` if the atomic application of
    /// mutations fails. The failure is surfaced through the committing
    /// transaction and is not retried by the workflow layer.
    fn apply_mutations(&self, mutations: Vec<StorageMutation>) -> Result<()>;
}
