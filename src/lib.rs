pub mod errors;
pub mod data_store;
pub mod transaction;
pub mod maat;
pub mod storage;
pub mod client;
pub mod conflict;
pub mod workflow;

// Re-export key types and structs for easier access
pub use errors::{MaatError, Result};
pub use data_store::txn_buffer::TxnBuffer;
pub use data_store::versioned_value::VersionedValue;
pub use maat::Maat;
pub use maat::prelude;
pub use transaction::Transaction;
pub use storage::{Storage, StorageMutation};
pub use client::{StoreClient, StoreTransaction};
pub use conflict::classify::{ConflictClass, classify};
pub use workflow::{
    AuditEntry, AuditWriter, BackoffPolicy, ConsistencyReport, ConsistencyVerifier, Entity,
    LedgerEntry, LedgerWriter, Outcome, TransactionCoordinator,
};
