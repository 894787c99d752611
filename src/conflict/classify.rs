use crate::errors::MaatError;

/// Decides whether a commit failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictClass {
    /// A serialization or write-write conflict. A later attempt over a
    /// fresh snapshot may succeed once contention subsides.
    Retryable,
    /// Anything else. Propagated to the caller unchanged, never retried.
    Fatal,
}

/// Maps a store error into [`ConflictClass`].
///
/// Classification matches on the error kind. The substring check on
/// `StorageError` exists only for storage backends that surface their own
/// conflicts as plain text; every structured kind is matched directly.
pub fn classify(error: &MaatError) -> ConflictClass {
    match error {
        MaatError::TransactionConflict => ConflictClass::Retryable,
        MaatError::StorageError(message) if is_conflict_text(message) => ConflictClass::Retryable,
        _ => ConflictClass::Fatal,
    }
}

fn is_conflict_text(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("conflict") || lower.contains("could not serialize")
}
