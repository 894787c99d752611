use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::StoreTransaction;
use crate::errors::{MaatError, Result};

/// Keyspace prefix for ledger entries.
pub const LEDGER_PREFIX: &str = "ledger/";

/// One applied state transition, immutable once committed.
///
/// Keyed by `id`, a uniqueness token independent of the transition
/// content, so two transitions with identical old/new values remain
/// distinguishable entries. `seq` is the entity revision this transition
/// produced; sorting by it reconstructs the transition history exactly,
/// independent of wall clocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub entity_id: String,
    pub kind: String,
    pub old_status: String,
    pub new_status: String,
    pub amount: f64,
    pub seq: u64,
    pub recorded_at: u64,
}

impl LedgerEntry {
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| MaatError::SerializationError(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| MaatError::SerializationError(e.to_string()))
    }
}

/// Thin write helper invoked from within the coordinator's transaction.
/// Never opens a transaction of its own.
pub struct LedgerWriter;

impl LedgerWriter {
    /// Appends one entry under `ledger/<uuid>` inside `txn`.
    pub fn append(txn: &mut dyn StoreTransaction, entry: &LedgerEntry) -> Result<()> {
        let key = format!("{LEDGER_PREFIX}{}", entry.id);
        txn.put(&key, entry.encode()?)
    }
}

/// Reads ledger entries inside `txn`, optionally filtered to one entity,
/// ordered by (entity, seq).
pub fn read_entries(
    txn: &mut dyn StoreTransaction,
    entity_id: Option<&str>,
) -> Result<Vec<LedgerEntry>> {
    let mut entries = txn
        .scan_prefix(LEDGER_PREFIX)?
        .iter()
        .map(|(_, bytes)| LedgerEntry::decode(bytes))
        .collect::<Result<Vec<_>>>()?;

    if let Some(id) = entity_id {
        entries.retain(|entry| entry.entity_id == id);
    }
    entries.sort_by(|a, b| {
        a.entity_id
            .cmp(&b.entity_id)
            .then_with(|| a.seq.cmp(&b.seq))
    });
    Ok(entries)
}
