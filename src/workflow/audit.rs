use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::client::StoreTransaction;
use crate::errors::{MaatError, Result};

/// Keyspace prefix for audit entries.
pub const AUDIT_PREFIX: &str = "audit/";

/// One actor action that reached the write phase, immutable once committed.
/// Always co-written with its [`crate::workflow::LedgerEntry`] in the same
/// transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub recorded_at: u64,
    pub actor: String,
    pub action: String,
    pub entity_id: String,
    pub justification: String,
}

impl AuditEntry {
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| MaatError::SerializationError(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| MaatError::SerializationError(e.to_string()))
    }
}

/// Thin write helper invoked from within the coordinator's transaction.
/// Never opens a transaction of its own.
pub struct AuditWriter;

impl AuditWriter {
    /// Appends one entry inside `txn`.
    ///
    /// Keys are zero-padded epoch microseconds plus a random tie-breaking
    /// suffix, so a prefix scan over `audit/` yields the trail in
    /// chronological order.
    pub fn append(txn: &mut dyn StoreTransaction, entry: &AuditEntry) -> Result<()> {
        let suffix: u32 = rand::rng().random();
        let key = format!("{AUDIT_PREFIX}{:020}-{:08x}", entry.recorded_at, suffix);
        txn.put(&key, entry.encode()?)
    }
}

/// Reads audit entries inside `txn`, optionally filtered to one entity.
/// Key order of the audit keyspace is chronological order.
pub fn read_entries(
    txn: &mut dyn StoreTransaction,
    entity_id: Option<&str>,
) -> Result<Vec<AuditEntry>> {
    let mut entries = txn
        .scan_prefix(AUDIT_PREFIX)?
        .iter()
        .map(|(_, bytes)| AuditEntry::decode(bytes))
        .collect::<Result<Vec<_>>>()?;

    if let Some(id) = entity_id {
        entries.retain(|entry| entry.entity_id == id);
    }
    Ok(entries)
}
