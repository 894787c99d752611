use ahash::AHashMap as HashMap;

use crate::data_store::txn_buffer::TxnBuffer;

/// Represents the type of conflict detected.
#[derive(Debug, PartialEq, Eq)]
pub enum ConflictType {
    /// The transaction read data that was modified by another transaction.
    ReadWrite,
    /// The transaction attempted to write to data that was modified by another transaction.
    WriteWrite,
    /// The transaction read data that was deleted by another transaction.
    ReadDelete,
}

/// Checks a transaction's read and write sets against the committed buffer
/// state. Called with the commit lock held, so the buffer cannot move under
/// the validation.
///
/// Read validation: any key whose committed version is newer than the
/// version the transaction observed means the snapshot went stale. A read
/// of an absent key records version 0, so a concurrent insert of that key
/// is caught the same way. Write validation: keys written without a prior
/// read fall back to the transaction's start version, which precedes every
/// concurrent commit (first committer wins).
pub fn detect_conflicts(
    start_version: u64,
    read_set: &HashMap<String, u64>,
    write_set: &HashMap<String, Option<Vec<u8>>>,
    txn_buffer: &TxnBuffer,
) -> HashMap<String, ConflictType> {
    let mut conflicts: HashMap<String, ConflictType> = HashMap::new();

    for (key, read_version) in read_set {
        match txn_buffer.get(key) {
            Some(current_value) => {
                if current_value.version() > *read_version {
                    conflicts.insert(key.clone(), ConflictType::ReadWrite);
                }
            }
            None => {
                if *read_version > 0 {
                    conflicts.insert(key.clone(), ConflictType::ReadDelete);
                }
            }
        }
    }

    for key in write_set.keys() {
        if let Some(current_value) = txn_buffer.get(key) {
            let observed_version = read_set.get(key).copied().unwrap_or(start_version);
            if current_value.version() > observed_version {
                conflicts.insert(key.clone(), ConflictType::WriteWrite);
            }
        }
    }

    conflicts
}
