use log::{debug, warn};
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

use crate::client::{StoreClient, StoreTransaction};
use crate::conflict::classify::{ConflictClass, classify};
use crate::errors::Result;
use crate::workflow::audit::{self, AuditEntry, AuditWriter};
use crate::workflow::backoff::BackoffPolicy;
use crate::workflow::entity::Entity;
use crate::workflow::ledger::{self, LedgerEntry, LedgerWriter};
use crate::workflow::now_micros;

/// The result of one `process_transition` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The transition committed, with its ledger and audit entries.
    Success,
    /// The entity does not exist. Surfaced immediately, never retried.
    NotFound,
    /// The entity already holds the requested status. Nothing was written.
    NoOp,
    /// Every attempt hit a retryable conflict and `max_attempts` is
    /// exhausted. A later call may still succeed once contention subsides.
    Conflict,
}

/// Orchestrates the read-modify-write cycle of a state transition.
///
/// The coordinator is stateless and holds no locks of its own; all
/// coordination is delegated to the store's transaction isolation. Every
/// attempt opens a fresh transaction and re-reads the entity. A stale
/// snapshot is never reused across retries.
#[derive(Clone)]
pub struct TransactionCoordinator {
    store: Arc<dyn StoreClient>,
    backoff: BackoffPolicy,
}

impl TransactionCoordinator {
    pub fn new(store: Arc<dyn StoreClient>, backoff: BackoffPolicy) -> Self {
        Self { store, backoff }
    }

    /// Attempts to transition `entity_id` to `requested_status` on behalf
    /// of `actor`, retrying classified-retryable commit conflicts up to
    /// `max_attempts` times.
    ///
    /// Per attempt: read the entity inside a fresh serializable
    /// transaction; absent → [`Outcome::NotFound`]; already at the
    /// requested status → [`Outcome::NoOp`] (checked on every attempt, so
    /// a transition that becomes a no-op only after a competing commit
    /// yields `NoOp` instead of a duplicate write). Otherwise the updated
    /// entity, one [`LedgerEntry`], and one [`AuditEntry`] are written in
    /// the same transaction and committed together.
    ///
    /// Only conflicts are absorbed by retrying; any other failure is
    /// returned unchanged after aborting the attempt.
    pub fn process_transition(
        &self,
        actor: &str,
        entity_id: &str,
        requested_status: &str,
        justification: &str,
        max_attempts: u32,
    ) -> Result<Outcome> {
        let max_attempts = max_attempts.max(1);
        let key = Entity::storage_key(entity_id);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let mut txn = self.store.begin_transaction();

            let found = match txn.get(&key) {
                Ok(found) => found,
                Err(err) => {
                    txn.abort();
                    return Err(err);
                }
            };
            let Some(bytes) = found else {
                txn.abort();
                debug!("entity {entity_id} not found, not retrying");
                return Ok(Outcome::NotFound);
            };
            let mut entity = match Entity::decode(&bytes) {
                Ok(entity) => entity,
                Err(err) => {
                    txn.abort();
                    return Err(err);
                }
            };

            if entity.status == requested_status {
                txn.abort();
                debug!("entity {entity_id} already {requested_status}, nothing to write");
                return Ok(Outcome::NoOp);
            }

            let old_status = std::mem::replace(&mut entity.status, requested_status.to_string());
            entity.last_updated_by = actor.to_string();
            entity.revision += 1;
            entity.updated_at = now_micros();

            let ledger_entry = LedgerEntry {
                id: Uuid::new_v4(),
                entity_id: entity.id.clone(),
                kind: "status_change".to_string(),
                old_status,
                new_status: entity.status.clone(),
                amount: entity.amount,
                seq: entity.revision,
                recorded_at: entity.updated_at,
            };
            let audit_entry = AuditEntry {
                recorded_at: entity.updated_at,
                actor: actor.to_string(),
                action: format!("transition:{requested_status}"),
                entity_id: entity.id.clone(),
                justification: justification.to_string(),
            };

            if let Err(err) = stage_transition(txn.as_mut(), &key, &entity, &ledger_entry, &audit_entry)
            {
                txn.abort();
                return Err(err);
            }

            match txn.commit() {
                Ok(()) => {
                    debug!(
                        "entity {entity_id}: {} -> {} by {actor} (attempt {attempt})",
                        ledger_entry.old_status, ledger_entry.new_status
                    );
                    return Ok(Outcome::Success);
                }
                Err(err) => match classify(&err) {
                    ConflictClass::Retryable if attempt < max_attempts => {
                        let delay = self.backoff.delay(attempt);
                        debug!(
                            "entity {entity_id}: attempt {attempt} conflicted, retrying in {delay:?}"
                        );
                        thread::sleep(delay);
                    }
                    ConflictClass::Retryable => {
                        warn!(
                            "entity {entity_id}: giving up after {max_attempts} conflicting attempts"
                        );
                        return Ok(Outcome::Conflict);
                    }
                    ConflictClass::Fatal => return Err(err),
                },
            }
        }
    }

    /// Returns ledger entries, optionally filtered to one entity, ordered
    /// by (entity, seq).
    pub fn get_ledger(&self, entity_id: Option<&str>) -> Result<Vec<LedgerEntry>> {
        let mut txn = self.store.begin_transaction();
        let entries = ledger::read_entries(txn.as_mut(), entity_id);
        txn.abort();
        entries
    }

    /// Returns audit entries, optionally filtered to one entity, in
    /// chronological order.
    pub fn get_audit_trail(&self, entity_id: Option<&str>) -> Result<Vec<AuditEntry>> {
        let mut txn = self.store.begin_transaction();
        let entries = audit::read_entries(txn.as_mut(), entity_id);
        txn.abort();
        entries
    }
}

/// Entity update, ledger entry, and audit entry belong to the same
/// transaction; a failure staging any of them aborts the attempt whole.
fn stage_transition(
    txn: &mut dyn StoreTransaction,
    key: &str,
    entity: &Entity,
    ledger_entry: &LedgerEntry,
    audit_entry: &AuditEntry,
) -> Result<()> {
    txn.put(key, entity.encode()?)?;
    LedgerWriter::append(txn, ledger_entry)?;
    AuditWriter::append(txn, audit_entry)
}
