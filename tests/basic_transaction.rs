use std::sync::Arc;

use maat::{Maat, MaatError};


// Configure tests to run single-threaded
#[cfg(test)]
mod single_threaded_tests {
    use super::*;

    #[test]
    fn test_basic_maat_creation() {
        let storage = Arc::new(mock_storage::MockStorage::new());
        let maat = Maat::new(storage);

        // Assert that the Maat instance is created and transaction IDs are incrementing
        assert_eq!(maat.start_transaction().id(), 0);
        assert_eq!(maat.start_transaction().id(), 1);
    }

    #[test]
    fn test_basic_read_write_commit() {
        let storage = Arc::new(mock_storage::MockStorage::new());
        let maat = Maat::new(storage.clone());

        // Start a transaction, write data, and commit
        let mut txn = maat.start_transaction();
        txn.write("key1".to_string(), b"value-one".to_vec()).unwrap();
        txn.commit().unwrap();

        // Verify the data reached the mock storage
        assert_eq!(storage.get("key1"), Some(b"value-one".to_vec()));

        // Start another transaction and read the data
        let mut txn2 = maat.start_transaction();
        let read_bytes = txn2.read("key1").unwrap().unwrap();
        assert_eq!(*read_bytes, b"value-one".to_vec());
    }

    #[test]
    fn test_basic_delete_commit() {
        let storage = Arc::new(mock_storage::MockStorage::new());
        let maat = Maat::new(storage.clone());

        // Write and commit initial data
        let mut txn = maat.start_transaction();
        txn.write("key1".to_string(), b"value-one".to_vec()).unwrap();
        txn.commit().unwrap();

        assert!(storage.get("key1").is_some());

        // Start a new transaction, delete data, and commit
        let mut txn2 = maat.start_transaction();
        txn2.delete("key1").unwrap();
        txn2.commit().unwrap();

        // Verify data is deleted from storage
        assert!(storage.get("key1").is_none());

        // Start another transaction and try to read the deleted data
        let mut txn3 = maat.start_transaction();
        let read_bytes = txn3.read("key1").unwrap();
        assert!(read_bytes.is_none());
    }

    #[test]
    fn test_basic_rollback() {
        let storage = Arc::new(mock_storage::MockStorage::new());
        let maat = Maat::new(storage.clone());

        // Start a transaction, write data, and rollback
        let mut txn = maat.start_transaction();
        txn.write("key1".to_string(), b"value-one".to_vec()).unwrap();
        txn.rollback();

        // Verify the data is NOT in the mock storage
        assert!(storage.get("key1").is_none());

        let mut txn2 = maat.start_transaction();
        let read_bytes = txn2.read("key1").unwrap();
        assert!(read_bytes.is_none());
    }

    #[test]
    fn test_stale_read_fails_commit() {
        let storage = Arc::new(mock_storage::MockStorage::new());
        let maat = Maat::new(storage);

        let mut setup_txn = maat.start_transaction();
        setup_txn.write("key1".to_string(), b"initial".to_vec()).unwrap();
        setup_txn.commit().unwrap();

        // txn1 reads, txn2 commits a newer version, txn1's commit must fail
        let mut txn1 = maat.start_transaction();
        let read_bytes = txn1.read("key1").unwrap().unwrap();
        assert_eq!(*read_bytes, b"initial".to_vec());

        let mut txn2 = maat.start_transaction();
        txn2.write("key1".to_string(), b"updated-by-txn2".to_vec()).unwrap();
        txn2.commit().unwrap();

        txn1.write("key1".to_string(), b"updated-by-txn1".to_vec()).unwrap();
        let commit_result = txn1.commit();
        match commit_result {
            Err(MaatError::TransactionConflict) => {}
            other => panic!("expected TransactionConflict, got {:?}", other),
        }

        // The loser left no trace
        let mut verify_txn = maat.start_transaction();
        let final_bytes = verify_txn.read("key1").unwrap().unwrap();
        assert_eq!(*final_bytes, b"updated-by-txn2".to_vec());
    }

    #[test]
    fn test_concurrent_insert_of_same_key_fails_commit() {
        let storage = Arc::new(mock_storage::MockStorage::new());
        let maat = Maat::new(storage);

        // Both transactions observe the key as absent
        let mut txn1 = maat.start_transaction();
        assert!(txn1.read("fresh-key").unwrap().is_none());
        let mut txn2 = maat.start_transaction();
        assert!(txn2.read("fresh-key").unwrap().is_none());

        txn1.write("fresh-key".to_string(), b"from-txn1".to_vec()).unwrap();
        txn2.write("fresh-key".to_string(), b"from-txn2".to_vec()).unwrap();

        txn1.commit().unwrap();
        match txn2.commit() {
            Err(MaatError::TransactionConflict) => {}
            other => panic!("expected TransactionConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_prefix_layers_staged_writes() {
        let storage = Arc::new(mock_storage::MockStorage::new());
        let maat = Maat::new(storage);

        let mut setup_txn = maat.start_transaction();
        setup_txn.write("acct/1".to_string(), b"a1".to_vec()).unwrap();
        setup_txn.write("acct/2".to_string(), b"a2".to_vec()).unwrap();
        setup_txn.write("note/1".to_string(), b"n1".to_vec()).unwrap();
        setup_txn.commit().unwrap();

        // Stage one insert and one delete, then scan before committing
        let mut txn = maat.start_transaction();
        txn.write("acct/3".to_string(), b"a3".to_vec()).unwrap();
        txn.delete("acct/1").unwrap();

        let entries = txn.scan_prefix("acct/").unwrap();
        let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["acct/2", "acct/3"]);

        txn.rollback();

        // After rollback the committed state is untouched
        let mut txn2 = maat.start_transaction();
        let entries = txn2.scan_prefix("acct/").unwrap();
        let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["acct/1", "acct/2"]);
    }
}
