use serde::{Deserialize, Serialize};

use crate::errors::{MaatError, Result};
use crate::workflow::now_micros;

/// Keyspace prefix for entities.
pub const ENTITY_PREFIX: &str = "entity/";

/// The shared business record actors race to transition.
///
/// `status` is drawn from whatever finite set the application defines; the
/// coordinator only compares it for equality. `revision` counts applied
/// transitions and gives ledger entries their exact chronological order.
/// The entity is owned by the store; the coordinator never caches one
/// across attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub status: String,
    pub amount: f64,
    pub owner: String,
    pub last_updated_by: String,
    pub updated_at: u64,
    pub revision: u64,
}

impl Entity {
    /// Creates a fresh entity at revision 0. Written through a plain store
    /// transaction by whatever setup step owns entity creation; the
    /// coordinator only ever updates existing entities.
    pub fn new(id: &str, status: &str, amount: f64, owner: &str) -> Self {
        Self {
            id: id.to_string(),
            status: status.to_string(),
            amount,
            owner: owner.to_string(),
            last_updated_by: owner.to_string(),
            updated_at: now_micros(),
            revision: 0,
        }
    }

    /// The store key for an entity id.
    pub fn storage_key(id: &str) -> String {
        format!("{ENTITY_PREFIX}{id}")
    }

    /// The store key for this entity.
    pub fn key(&self) -> String {
        Self::storage_key(&self.id)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| MaatError::SerializationError(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| MaatError::SerializationError(e.to_string()))
    }
}
