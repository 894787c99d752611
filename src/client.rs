use crate::errors::Result;
use crate::maat::Maat;
use crate::transaction::Transaction;

/// The store contract the workflow layer is written against.
///
/// The coordinator receives a client value at construction and opens one
/// transaction per attempt through it, never through a process-wide
/// handle. [`Maat`]
/// implements the trait directly; tests wrap it to count attempts or
/// inject commit failures.
pub trait StoreClient: Send + Sync {
    /// Opens a new serializable transaction.
    fn begin_transaction(&self) -> Box<dyn StoreTransaction + '_>;
}

/// One open transaction against the store.
///
/// An operation either commits in full or leaves no trace. A conflicting
/// concurrent commit is reported as `MaatError::TransactionConflict`,
/// distinguishable from every other failure.
pub trait StoreTransaction {
    /// Reads the value under `key`, or `None` if absent.
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stages a write of `value` under `key`.
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Returns the visible entries under `prefix`, ordered by key.
    fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;

    /// Validates and applies the transaction.
    fn commit(self: Box<Self>) -> Result<()>;

    /// Discards the transaction. No-op rollback: nothing was visible yet.
    fn abort(self: Box<Self>);
}

impl StoreClient for Maat {
    fn begin_transaction(&self) -> Box<dyn StoreTransaction + '_> {
        Box::new(self.start_transaction())
    }
}

impl StoreTransaction for Transaction {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read(key)?.map(|bytes| bytes.as_ref().clone()))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.write(key.to_string(), value)
    }

    fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let entries = Transaction::scan_prefix(self, prefix)?;
        Ok(entries
            .into_iter()
            .map(|(key, bytes)| (key, bytes.as_ref().clone()))
            .collect())
    }

    fn commit(self: Box<Self>) -> Result<()> {
        (*self).commit()
    }

    fn abort(self: Box<Self>) {
        (*self).rollback()
    }
}
