use crate::client::StoreClient;
use crate::errors::Result;
use crate::workflow::audit::{self, AuditEntry};
use crate::workflow::entity::Entity;
use crate::workflow::ledger::{self, LedgerEntry};

/// What the verifier found for one entity.
#[derive(Debug)]
pub struct ConsistencyReport {
    pub entity: Option<Entity>,
    pub ledger_entries: Vec<LedgerEntry>,
    pub audit_entries: Vec<AuditEntry>,
    pub violations: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Read-only checker that the ledger and audit streams of an entity are
/// mutually consistent. Used by the test suite, never by write paths.
///
/// Checks, per entity:
/// - the current status equals the `new_status` of the chronologically
///   last ledger entry (or the ledger is empty and the entity still sits
///   at its initial state), and the revision equals the entry count with
///   seqs running 1..=count;
/// - ledger and audit counts match (every applied transition was both
///   ledgered and audited);
/// - no entry records a transition onto itself.
pub struct ConsistencyVerifier;

impl ConsistencyVerifier {
    pub fn verify(store: &dyn StoreClient, entity_id: &str) -> Result<ConsistencyReport> {
        let mut txn = store.begin_transaction();

        let entity = match txn.get(&Entity::storage_key(entity_id)) {
            Ok(found) => match found {
                Some(bytes) => match Entity::decode(&bytes) {
                    Ok(entity) => Some(entity),
                    Err(err) => {
                        txn.abort();
                        return Err(err);
                    }
                },
                None => None,
            },
            Err(err) => {
                txn.abort();
                return Err(err);
            }
        };
        let ledger_entries = match ledger::read_entries(txn.as_mut(), Some(entity_id)) {
            Ok(entries) => entries,
            Err(err) => {
                txn.abort();
                return Err(err);
            }
        };
        let audit_entries = match audit::read_entries(txn.as_mut(), Some(entity_id)) {
            Ok(entries) => entries,
            Err(err) => {
                txn.abort();
                return Err(err);
            }
        };
        txn.abort();

        let mut violations = Vec::new();

        for entry in &ledger_entries {
            if entry.old_status == entry.new_status {
                violations.push(format!(
                    "ledger entry {} records a no-op transition {} -> {}",
                    entry.id, entry.old_status, entry.new_status
                ));
            }
        }

        if ledger_entries.len() != audit_entries.len() {
            violations.push(format!(
                "{} ledger entries but {} audit entries",
                ledger_entries.len(),
                audit_entries.len()
            ));
        }

        match &entity {
            Some(entity) => {
                if entity.revision != ledger_entries.len() as u64 {
                    violations.push(format!(
                        "entity revision {} but {} ledger entries",
                        entity.revision,
                        ledger_entries.len()
                    ));
                }
                for (index, entry) in ledger_entries.iter().enumerate() {
                    let expected_seq = index as u64 + 1;
                    if entry.seq != expected_seq {
                        violations.push(format!(
                            "ledger entry {} has seq {} where {} was expected",
                            entry.id, entry.seq, expected_seq
                        ));
                    }
                }
                if let Some(last) = ledger_entries.last() {
                    if last.new_status != entity.status {
                        violations.push(format!(
                            "entity status {} but last ledger entry ends at {}",
                            entity.status, last.new_status
                        ));
                    }
                }
            }
            None => {
                if !ledger_entries.is_empty() || !audit_entries.is_empty() {
                    violations.push(format!(
                        "entity {entity_id} is absent but has ledger or audit entries"
                    ));
                }
            }
        }

        Ok(ConsistencyReport {
            entity,
            ledger_entries,
            audit_entries,
            violations,
        })
    }
}
