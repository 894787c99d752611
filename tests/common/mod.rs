//! Common utilities for Maat integration tests.

use ahash::AHashMap as HashMap;
use maat::errors::Result;
use maat::storage::{Storage, StorageMutation};
use maat::{Entity, Maat};
use std::sync::{Arc, Mutex};

// --- MockStorage ---

/// A mock implementation of the `Storage` trait for testing purposes.
/// Stores committed bytes in an in-memory HashMap.
#[derive(Debug)]
pub struct MockStorage {
    data: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockStorage {
    /// Creates a new `MockStorage` instance.
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }

    /// Retrieves a record from the mock storage.
    #[allow(dead_code)]
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let data = self.data.lock().unwrap();
        data.get(key).cloned()
    }
}

impl Storage for MockStorage {
    fn apply_mutations(&self, mutations: Vec<StorageMutation>) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        for mutation in mutations {
            match mutation {
                StorageMutation::Insert(key, bytes) => {
                    data.insert(key, bytes);
                }
                StorageMutation::Delete(key) => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }
}

// --- Helper Functions ---

/// Helper function to create a Maat engine backed by MockStorage.
pub fn setup_maat() -> Arc<Maat> {
    let storage = Arc::new(MockStorage::new());
    Arc::new(Maat::new(storage))
}

/// Commits a fresh entity through a plain transaction, the way a setup
/// step outside the coordinator would.
pub fn seed_entity(maat: &Maat, id: &str, status: &str, amount: f64, owner: &str) -> Entity {
    let entity = Entity::new(id, status, amount, owner);
    let mut txn = maat.start_transaction();
    txn.write(entity.key(), entity.encode().unwrap()).unwrap();
    txn.commit().unwrap();
    entity
}

/// Reads an entity back through a throwaway transaction.
#[allow(dead_code)]
pub fn read_entity(maat: &Maat, id: &str) -> Option<Entity> {
    let mut txn = maat.start_transaction();
    let found = txn.read(&Entity::storage_key(id)).unwrap();
    let entity = found.map(|bytes| Entity::decode(&bytes).unwrap());
    txn.rollback();
    entity
}
