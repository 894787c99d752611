//! The optimistic transaction workflow built on top of the store contract:
//! entity transitions, their ledger and audit records, and the retry
//! coordinator that applies them.

pub mod audit;
pub mod backoff;
pub mod coordinator;
pub mod entity;
pub mod ledger;
pub mod verifier;

pub use audit::{AuditEntry, AuditWriter};
pub use backoff::BackoffPolicy;
pub use coordinator::{Outcome, TransactionCoordinator};
pub use entity::Entity;
pub use ledger::{LedgerEntry, LedgerWriter};
pub use verifier::{ConsistencyReport, ConsistencyVerifier};

use std::time::{SystemTime, UNIX_EPOCH};

/// Microseconds since the Unix epoch.
pub(crate) fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}
