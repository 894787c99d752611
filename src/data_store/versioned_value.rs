use std::sync::Arc;

/// Represents a committed value with an associated version.
///
/// Data items stored in the transaction buffer are wrapped in
/// `VersionedValue` to track the commit version at which the bytes were
/// last written. Conflict detection compares these versions against the
/// versions a transaction observed when it read.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedValue {
    /// The encoded record bytes.
    data: Arc<Vec<u8>>,
    /// The commit version of the transaction that last wrote this value.
    version: u64,
}

impl VersionedValue {
    /// Associates encoded bytes with the commit version that produced them.
    pub fn new(data: Arc<Vec<u8>>, version: u64) -> Self {
        Self { data, version }
    }

    /// Returns a reference to the encoded bytes.
    pub fn data(&self) -> &Arc<Vec<u8>> {
        &self.data
    }

    /// Returns the commit version of the value.
    pub fn version(&self) -> u64 {
        self.version
    }
}
