use crossbeam_skiplist::SkipMap;

use crate::data_store::versioned_value::VersionedValue;

/// The key type for data items in the store. Using String for now.
type DataKey = String;

/// The Transaction Buffer (TxnBuffer) implemented using a lock-free SkipMap.
/// This holds the committed in-memory state of the data. The map is ordered
/// by key, which is what makes prefix scans over the ledger and audit
/// keyspaces cheap.
pub struct TxnBuffer {
    data: SkipMap<DataKey, VersionedValue>,
}

impl TxnBuffer {
    /// Creates a new, empty `TxnBuffer`.
    pub fn new() -> Self {
        Self {
            data: SkipMap::new(),
        }
    }

    /// Retrieves a `VersionedValue` from the buffer based on the key.
    /// Returns `None` if the key does not exist.
    pub fn get(&self, key: &DataKey) -> Option<VersionedValue> {
        self.data.get(key).map(|entry| entry.value().clone())
    }

    /// Inserts or updates a `VersionedValue` in the buffer.
    /// This operation is atomic for the specific key.
    pub fn insert(&self, key: DataKey, value: VersionedValue) {
        self.data.insert(key, value);
    }

    /// Removes a value from the buffer based on the key.
    /// Returns the removed `VersionedValue` if one existed.
    pub fn delete(&self, key: &DataKey) -> Option<VersionedValue> {
        self.data.remove(key).map(|entry| entry.value().clone())
    }

    /// Returns all entries whose key starts with `prefix`, in key order.
    pub fn scan_prefix(&self, prefix: &str) -> Vec<(DataKey, VersionedValue)> {
        self.data
            .range(prefix.to_string()..)
            .take_while(|entry| entry.key().starts_with(prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

impl Default for TxnBuffer {
    fn default() -> Self {
        Self::new()
    }
}
