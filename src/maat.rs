use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::data_store::txn_buffer::TxnBuffer;
use crate::storage::Storage;
use crate::transaction::Transaction;

/// Maat Prelude
pub mod prelude {
    pub use crate::client::*;
    pub use crate::conflict::classify::*;
    pub use crate::data_store::txn_buffer::*;
    pub use crate::data_store::versioned_value::*;
    pub use crate::errors::*;
    pub use crate::storage::*;
    pub use crate::transaction::*;
    pub use crate::workflow::*;
    pub use crate::*;
}

/// The main entry point for the Maat transactional engine.
///
/// `Maat` owns the committed in-memory state and hands out serializable
/// [`Transaction`]s over it. It also implements
/// [`crate::client::StoreClient`], which is the contract the workflow layer
/// is written against.
pub struct Maat {
    /// The transaction buffer holding the committed in-memory state.
    txn_buffer: Arc<TxnBuffer>,
    /// A globally increasing counter for transaction IDs and commit versions.
    transaction_counter: Arc<AtomicU64>,
    /// The storage implementation for persisting committed data.
    storage: Arc<dyn Storage>,
    /// Serializes commit validation and application.
    commit_lock: Arc<Mutex<()>>,
}

impl Maat {
    /// Creates a new Maat engine over the given storage implementation.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            txn_buffer: Arc::new(TxnBuffer::new()),
            transaction_counter: Arc::new(AtomicU64::new(0)),
            storage,
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Starts a new transaction.
    pub fn start_transaction(&self) -> Transaction {
        // Atomically increment the transaction counter to get a unique ID.
        let transaction_id = self.transaction_counter.fetch_add(1, Ordering::SeqCst);

        Transaction::new(
            transaction_id,
            Arc::clone(&self.txn_buffer),
            Arc::clone(&self.transaction_counter),
            Arc::clone(&self.storage),
            Arc::clone(&self.commit_lock),
        )
    }
}
